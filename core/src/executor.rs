//! Batch execution: one request per input record, in input order.
//!
//! # Design
//! `run_item` is the whole per-record step and returns a plain `Result`.
//! The failure policy is applied only when aggregating, so the same step
//! serves both fail-fast and continue-on-fail runs. Records never share
//! state; the transport is borrowed immutably for the whole batch.

use serde_json::Value;

use crate::client::GreyhoundClient;
use crate::config::{FailurePolicy, NodeSettings};
use crate::credentials::GreyhoundCredentials;
use crate::error::{ExecutionError, NodeError};
use crate::output::OutputRecord;
use crate::params::NodeParameters;
use crate::transport::Transport;

/// Runs the GREYHOUND node over a batch of input records.
#[derive(Debug, Clone)]
pub struct NodeExecutor<T> {
    client: GreyhoundClient,
    transport: T,
    policy: FailurePolicy,
}

impl<T: Transport> NodeExecutor<T> {
    pub fn new(client: GreyhoundClient, transport: T, policy: FailurePolicy) -> Self {
        Self {
            client,
            transport,
            policy,
        }
    }

    /// Validate the credentials and build an executor from host settings.
    pub fn from_settings(
        credentials: &GreyhoundCredentials,
        settings: NodeSettings,
        transport: T,
    ) -> Result<Self, NodeError> {
        credentials.validate()?;
        let client = GreyhoundClient::with_profile(credentials, settings.profile);
        Ok(Self::new(client, transport, settings.failure_policy()))
    }

    pub fn client(&self) -> &GreyhoundClient {
        &self.client
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Build, send and parse the request for input record `index`.
    pub fn run_item(
        &self,
        index: usize,
        params: &NodeParameters,
    ) -> Result<Vec<OutputRecord>, NodeError> {
        let span = tracing::debug_span!(
            "greyhound_item",
            index,
            resource = %params.resource(),
            operation = %params.operation(),
        );
        let _enter = span.enter();

        let request = self.client.build_request(params)?;
        tracing::debug!(method = %request.method, url = %request.url, "built request");
        let response = self.transport.send(&request)?;
        tracing::debug!(status = response.status, "response received");
        let records = self.client.parse_response(response, index)?;
        tracing::debug!(records = records.len(), "normalized response");
        Ok(records)
    }

    /// Execute already-resolved parameters, one entry per input record.
    pub fn execute(&self, inputs: &[NodeParameters]) -> Result<Vec<OutputRecord>, ExecutionError> {
        self.aggregate(
            inputs
                .iter()
                .enumerate()
                .map(|(index, params)| (index, self.run_item(index, params))),
        )
    }

    /// Execute raw host form values; a record whose parameters fail to
    /// resolve is a failure of that record alone.
    pub fn execute_forms(&self, forms: &[Value]) -> Result<Vec<OutputRecord>, ExecutionError> {
        self.aggregate(forms.iter().enumerate().map(|(index, form)| {
            let result = NodeParameters::from_form(form)
                .and_then(|params| self.run_item(index, &params));
            (index, result)
        }))
    }

    /// Apply the failure policy. The iterator is lazy, so fail-fast stops
    /// issuing requests at the first failure.
    fn aggregate<I>(&self, results: I) -> Result<Vec<OutputRecord>, ExecutionError>
    where
        I: Iterator<Item = (usize, Result<Vec<OutputRecord>, NodeError>)>,
    {
        let mut output = Vec::new();
        for (index, result) in results {
            match result {
                Ok(records) => output.extend(records),
                Err(err) => match self.policy {
                    FailurePolicy::ContinueOnFail => {
                        tracing::warn!(index, error = %err, "item failed, continuing");
                        output.push(OutputRecord::error(&err.message(), index));
                    }
                    FailurePolicy::FailFast => {
                        tracing::error!(index, error = %err, "item failed, aborting batch");
                        return Err(ExecutionError { index, source: err });
                    }
                },
            }
        }
        Ok(output)
    }
}
