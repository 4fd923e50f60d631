use autocv_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("autocv error: {err}");
        std::process::exit(1);
    }
}
