use carousel::app::AppModel;
use carousel::config;
use carousel::sys::{TokioTimer, runtime};
use tokio::runtime::Handle;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = config::load_or_default();
    let (tx, rx) = async_channel::bounded(32);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async move {
        // Start Background Services
        runtime::start_background_services(tx.clone());

        let timer = TokioTimer::new(tx, Handle::current());
        let mut app = AppModel::new(&config, timer);
        app.run(rx).await;
    });

    carousel::sys::server::remove_socket(std::path::Path::new(carousel::protocol::SOCKET_PATH));
    Ok(())
}
