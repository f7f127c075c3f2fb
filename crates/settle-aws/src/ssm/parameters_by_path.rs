//! `aws_ssm_parameters_by_path` data source

use super::api::{Parameter, SsmApi};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use serde::{Deserialize, Serialize};
use settle_core::{
    ApiError, AttributeMap, DataSourceHandler, HandlerResult, OperationContext, OperationError,
    Phase, ResourceData, ResultExt, paginate,
};
use std::sync::Arc;

pub const PARAMETERS_BY_PATH_DATA_SOURCE_TYPE: &str = "aws_ssm_parameters_by_path";

const RESOURCE: &str = "SSM Parameters By Path";

fn default_with_decryption() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Query {
    path: String,
    #[serde(default = "default_with_decryption")]
    with_decryption: bool,
}

/// Parameters below one path, as parallel lists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParametersByPath {
    pub arns: Vec<String>,
    pub names: Vec<String>,
    pub types: Vec<String>,
    pub values: Vec<String>,
}

impl ParametersByPath {
    fn push(&mut self, parameter: Parameter) {
        self.arns.push(parameter.arn);
        self.names.push(parameter.name);
        self.types.push(parameter.kind);
        self.values.push(parameter.value);
    }
}

/// Drain every GetParametersByPath page below `path`
pub async fn find_parameters_by_path(
    api: &dyn SsmApi,
    path: &str,
    with_decryption: bool,
) -> Result<ParametersByPath, ApiError> {
    paginate(move |token| api.get_parameters_by_path(path, with_decryption, token))
        .try_fold(ParametersByPath::default(), |mut acc, parameter| async move {
            acc.push(parameter);
            Ok(acc)
        })
        .await
}

pub struct ParametersByPathDataSource {
    api: Arc<dyn SsmApi>,
}

impl ParametersByPathDataSource {
    pub fn new(api: Arc<dyn SsmApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSourceHandler for ParametersByPathDataSource {
    fn type_name(&self) -> &str {
        PARAMETERS_BY_PATH_DATA_SOURCE_TYPE
    }

    async fn read(&self, ctx: &OperationContext, data: &mut ResourceData) -> HandlerResult {
        let query: Query = data.config().phase(RESOURCE, data.id(), Phase::Reading)?;
        if let Some(reason) = ctx.err() {
            return Err(OperationError::new(RESOURCE, &query.path, Phase::Reading, reason));
        }

        let found = tokio::select! {
            found = find_parameters_by_path(self.api.as_ref(), &query.path, query.with_decryption) => found,
            reason = ctx.done() => {
                return Err(OperationError::new(RESOURCE, &query.path, Phase::Reading, reason));
            }
        };
        let found = found.phase(RESOURCE, &query.path, Phase::Reading)?;
        tracing::debug!(path = %query.path, count = found.names.len(), "read SSM parameters");

        let observed = AttributeMap::encode(&found).phase(RESOURCE, &query.path, Phase::Reading)?;
        data.set_id(query.path.as_str());
        data.set_all(observed);
        data.set("with_decryption", query.with_decryption);
        Ok(())
    }
}
