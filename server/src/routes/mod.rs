use aide::axum::ApiRouter;

pub mod predict;
pub mod system;

pub fn handler() -> ApiRouter {
	ApiRouter::new()
		.merge(system::handler())
		.merge(predict::handler())
}
