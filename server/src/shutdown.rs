use std::future::Future;

use tokio::{signal, sync::watch};

/// Resolves once the process is asked to stop, letting the server drain in-flight requests.
#[derive(Debug, Clone)]
pub struct Shutdown {
	sender: watch::Sender<bool>,
	receiver: watch::Receiver<bool>,
}

impl Shutdown {
	/// Create a shutdown handle that also fires on SIGINT and SIGTERM.
	pub fn new() -> Self {
		let shutdown = Self::manual();

		let sender = shutdown.sender.clone();
		tokio::spawn(async move {
			register_handlers().await;
			sender.send_replace(true);
		});

		shutdown
	}

	fn manual() -> Self {
		let (sender, receiver) = watch::channel(false);

		Self { sender, receiver }
	}

	pub fn handle(&self) -> impl Future<Output = ()> + Send + 'static {
		let mut receiver = self.receiver.clone();

		async move {
			let stopped = receiver.wait_for(|stopped| *stopped).await.is_ok();

			// Every sender is gone, so nothing can trigger a shutdown anymore.
			if !stopped {
				std::future::pending::<()>().await;
			}
		}
	}
}

async fn register_handlers() {
	let ctrl_c = async {
		if let Err(e) = signal::ctrl_c().await {
			tracing::error!("Failed to install Ctrl+C handler: {e}");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut sigterm) => {
				sigterm.recv().await;
			},
			Err(e) => {
				tracing::error!("Failed to install SIGTERM handler: {e}");
				std::future::pending::<()>().await;
			},
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		() = ctrl_c => {},
		() = terminate => {},
	}

	tracing::info!("Received shutdown signal");
}
