//! Scripted `WikiApi` used by unit tests across the crate.

use crate::error::{Result, WikiError};
use crate::wiki::{ApiParams, WikiApi};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub struct StubWiki {
    responses: Mutex<VecDeque<Result<Value>>>,
    calls: Mutex<Vec<ApiParams>>,
}

impl StubWiki {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, response: Value) -> Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn with_error(self, error: WikiError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<ApiParams> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl WikiApi for StubWiki {
    async fn get(&self, params: &ApiParams) -> Result<Value> {
        self.calls.lock().unwrap().push(params.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(WikiError::UpstreamQuery(format!(
                    "no scripted response for {}",
                    params
                )))
            })
    }
}
