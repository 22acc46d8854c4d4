// tests/common/mod.rs — Scripted transport shared by the client tests

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use pension_chat::client::{ClientContext, Method, Transport};
use pension_chat::infra::errors::{ClientError, Result};

/// One recorded outbound call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Value>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, value: Value) -> &Self {
        self.responses.lock().unwrap().push_back(Ok(value));
        self
    }

    pub fn fail(&self, status: u16) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(ClientError::Http {
                method: "MOCK".into(),
                path: "mock".into(),
                status,
                body: "mock failure".into(),
            }));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(&self, path: &str, method: Method, body: Option<Value>) -> Result<Value> {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            body,
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ClientError::UnexpectedResponse {
                    path: path.to_string(),
                    message: "no scripted response".into(),
                })
            })
    }
}

pub fn context() -> ClientContext {
    ClientContext::in_memory()
}
