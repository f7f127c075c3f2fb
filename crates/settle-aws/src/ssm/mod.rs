//! AWS Systems Manager Parameter Store

pub mod api;
pub mod parameters_by_path;

pub use api::{Parameter, SsmApi};
pub use parameters_by_path::{
    PARAMETERS_BY_PATH_DATA_SOURCE_TYPE, ParametersByPath, ParametersByPathDataSource,
    find_parameters_by_path,
};
