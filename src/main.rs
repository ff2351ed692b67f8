#[actix_web::main]
async fn main() -> std::io::Result<()> {
    datasweeper_lib::run().await
}
