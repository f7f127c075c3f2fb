mod common;

use common::{FakeAppStream, FakeKafka, FakeSsm};
use settle_aws::{AwsClients, AwsProvider};
use settle_core::ProviderConfig;
use std::sync::Arc;

fn provider() -> AwsProvider {
    let clients = AwsClients {
        appstream: Arc::new(FakeAppStream::new()),
        kafka: Arc::new(FakeKafka::default()),
        ssm: Arc::new(FakeSsm::default()),
    };
    AwsProvider::new(clients, ProviderConfig::default())
}

#[test]
fn test_resource_registry() {
    let provider = provider();

    for type_name in AwsProvider::resource_types() {
        let handler = provider.resource(type_name).unwrap();
        assert_eq!(handler.type_name(), *type_name);
    }
    assert!(provider.resource("aws_appstream_stack").is_none());
    assert!(provider.resource("aws_ssm_parameters_by_path").is_none());
}

#[test]
fn test_data_source_registry() {
    let provider = provider();

    let source = provider.data_source("aws_ssm_parameters_by_path").unwrap();
    assert_eq!(source.type_name(), "aws_ssm_parameters_by_path");
    assert!(provider.data_source("aws_appstream_fleet").is_none());
    assert_eq!(AwsProvider::data_source_types().len(), 1);
}
