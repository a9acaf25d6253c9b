//! Ordered request-processing stages.
//!
//! A [`Pipeline`] is a list of [`Stage`]s run front to back before the
//! router. Each stage either hands the (possibly enriched) request on with
//! [`Flow::Continue`] or answers it directly with [`Flow::Halt`]; the first
//! halt ends the run.
//!
//! ```rust,ignore
//! let pipeline = Pipeline::new()
//!     .stage(request_id_stage)
//!     .stage(auth_gate);
//!
//! let app = Router::new()
//!     .route("/api/me", get(me))
//!     .layer(middleware::from_fn_with_state(Arc::new(pipeline), pipeline_middleware));
//! ```

use axum::extract::Request;
use axum::response::Response;
use std::sync::Arc;

/// What a stage decided.
pub enum Flow {
    Continue(Request),
    Halt(Response),
}

impl std::fmt::Debug for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Flow::Continue(req) => f
                .debug_tuple("Continue")
                .field(&format_args!("{} {}", req.method(), req.uri()))
                .finish(),
            Flow::Halt(resp) => f.debug_tuple("Halt").field(&resp.status()).finish(),
        }
    }
}

/// One step of the pipeline. Stages must not keep per-request state.
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str {
        "anonymous"
    }

    fn apply(&self, req: Request) -> Flow;
}

impl<F> Stage for F
where
    F: Fn(Request) -> Flow + Send + Sync,
{
    fn apply(&self, req: Request) -> Flow {
        self(req)
    }
}

/// Stages composed in order.
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage.
    pub fn stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Runs every stage in order until one halts.
    pub fn run(&self, mut req: Request) -> Flow {
        for stage in &self.stages {
            match stage.apply(req) {
                Flow::Continue(next) => req = next,
                Flow::Halt(response) => {
                    tracing::trace!(stage = stage.name(), status = %response.status(), "Pipeline halted");
                    return Flow::Halt(response);
                }
            }
        }
        Flow::Continue(req)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}
