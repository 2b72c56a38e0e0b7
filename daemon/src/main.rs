mod control;
mod service;
mod settings;
mod settle;
mod sysfs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    service::run().await
}
