use std::sync::Arc;

use approval::ApprovalQueue;
use refindex::KnowledgeBase;
use workflow::WorkflowEngine;

use crate::config::ServerConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,

    /// Process-wide knowledge base, shared by matching and approvals.
    pub kb: Arc<KnowledgeBase>,

    /// Approval queue gating promotion into the knowledge base.
    pub queue: Arc<ApprovalQueue>,

    /// Workflow engine and store.
    pub engine: Arc<WorkflowEngine>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let kb = Arc::new(KnowledgeBase::new());
        let queue = Arc::new(ApprovalQueue::new(kb.clone()));
        let engine = Arc::new(WorkflowEngine::new(
            config.engine.clone(),
            kb.clone(),
            queue.clone(),
        ));
        Self {
            config: Arc::new(config),
            kb,
            queue,
            engine,
        }
    }
}
