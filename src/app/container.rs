use std::sync::Arc;

use crate::adapters::CommandLineTools;
use crate::app::pipeline_interactor::PipelineInteractor;
use crate::config::PipelineConfig;
use crate::ports::ExternalTool;

pub trait AppContainer: Send + Sync {
    fn pipeline_interactor(&self) -> Arc<PipelineInteractor>;
}

/// Wires the command-line tool adapter into the pipeline
pub struct DefaultAppContainer {
    pipeline_interactor: Arc<PipelineInteractor>,
}

impl DefaultAppContainer {
    pub fn new(config: PipelineConfig) -> Self {
        let tools = Arc::new(CommandLineTools::from_config(&config));
        Self::with_tools(tools, config)
    }

    /// Container over a caller-supplied tool implementation
    pub fn with_tools(tools: Arc<dyn ExternalTool>, config: PipelineConfig) -> Self {
        let pipeline_interactor = Arc::new(PipelineInteractor::new(tools, Arc::new(config)));
        Self {
            pipeline_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn pipeline_interactor(&self) -> Arc<PipelineInteractor> {
        Arc::clone(&self.pipeline_interactor)
    }
}
