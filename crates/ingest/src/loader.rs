//! Remote context loading.
use iref::{Iri, IriBuf};
use json_ld::loader::ReqwestLoader;
use json_ld::{LoadError, Loader, RemoteDocument};
use std::time::Duration;

/// Default timeout for remote context retrieval.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Loader used to fetch remote contexts over HTTP.
pub type RemoteLoader = TimeoutLoader<ReqwestLoader>;

/// Time limit exceeded while loading a document.
#[derive(Debug, thiserror::Error)]
#[error("no response after {0:?}")]
pub struct Timeout(pub Duration);

/// Loader giving up after a fixed amount of time.
pub struct TimeoutLoader<L> {
	inner: L,
	timeout: Duration,
}

impl<L> TimeoutLoader<L> {
	pub fn new(inner: L, timeout: Duration) -> Self {
		Self { inner, timeout }
	}

	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	pub fn inner(&self) -> &L {
		&self.inner
	}
}

impl RemoteLoader {
	/// Creates an HTTP loader with the given timeout.
	pub fn remote(timeout: Duration) -> Self {
		Self::new(ReqwestLoader::default(), timeout)
	}
}

impl Default for RemoteLoader {
	fn default() -> Self {
		Self::remote(DEFAULT_TIMEOUT)
	}
}

impl<L: Loader> Loader for TimeoutLoader<L> {
	async fn load(&self, url: &Iri) -> Result<RemoteDocument<IriBuf>, LoadError> {
		log::debug!("loading remote document `{url}`");
		match tokio::time::timeout(self.timeout, self.inner.load(url)).await {
			Ok(result) => result,
			Err(_) => {
				log::warn!("timeout while loading `{url}`");
				Err(LoadError::new(url.to_owned(), Timeout(self.timeout)))
			}
		}
	}
}
