// SPDX-FileCopyrightText: © 2026 The lambda_creator contributors
// SPDX-License-Identifier: MIT
use lambda_creator_api::identity::{PolicyDocument, BASIC_EXECUTION_POLICY_ARN};

use super::*;
use crate::test_utils::*;

const REPOSITORY_URI: &str = "123.dkr.ecr.r.amazonaws.com/repo";

fn cloud() -> MockCloud {
    MockCloud::default().with_repository("repo", REPOSITORY_URI).with_role("exec")
}

fn creation_request() -> CreationRequest {
    let mut request = CreationRequest::new("f1", "repo");
    request.role_name = Some("exec".to_string());
    request
}

#[tokio::test]
async fn create_with_existing_role() {
    init_logger();
    let (mut manager, mut receiver) = cloud().function_manager();

    let mut request = creation_request();
    request.environment = Some(std::collections::HashMap::new());
    request.tags = Some(std::collections::HashMap::from([("team".to_string(), "data".to_string())]));
    let configuration = manager.create(request).await.unwrap();
    assert_eq!(Some("f1".to_string()), configuration.function_name);
    assert_eq!(Some(role_arn("exec")), configuration.role);

    let events = drain(&mut receiver);
    assert_eq!(3, events.len());
    assert_eq!(MockEvent::DescribeRepository("repo".to_string()), events[0]);
    assert_eq!(MockEvent::GetRole("exec".to_string()), events[1]);
    match &events[2] {
        MockEvent::CreateFunction(input) => {
            assert_eq!("123.dkr.ecr.r.amazonaws.com/repo:latest", input.image.to_string());
            assert_eq!(role_arn("exec"), input.role_arn);
            assert_eq!(128, input.memory_size);
            assert_eq!(30, input.timeout);
            // Empty environments are not submitted.
            assert!(input.environment.is_none());
            assert_eq!("data", input.tags["team"]);
            assert!(input.vpc_config.is_none());
        }
        event => panic!("unexpected event: {:?}", event),
    }
}

#[tokio::test]
async fn create_provisions_role() {
    init_logger();
    let (mut manager, mut receiver) = cloud().function_manager();

    let mut request = CreationRequest::new("f1", "repo");
    request.image_tag = "v2".to_string();
    manager.create(request).await.unwrap();

    let events = drain(&mut receiver);
    assert_eq!(6, events.len());
    assert_eq!(MockEvent::DescribeRepository("repo".to_string()), events[0]);
    let role_name = match &events[1] {
        MockEvent::CreateRole(role_name, trust_policy) => {
            assert_eq!(&PolicyDocument::lambda_trust_policy(), trust_policy);
            role_name.clone()
        }
        event => panic!("unexpected event: {:?}", event),
    };
    assert!(role_name.strip_prefix("f1-role-").unwrap().parse::<i64>().is_ok());
    assert_eq!(
        MockEvent::AttachRolePolicy(role_name.clone(), BASIC_EXECUTION_POLICY_ARN.to_string()),
        events[2]
    );
    assert!(matches!(&events[3], MockEvent::CreatePolicy(name, _) if *name == format!("{}-s3-access-policy", role_name)));
    assert!(matches!(&events[4], MockEvent::AttachRolePolicy(..)));
    match &events[5] {
        MockEvent::CreateFunction(input) => {
            assert_eq!("123.dkr.ecr.r.amazonaws.com/repo:v2", input.image.to_string());
            assert_eq!(role_arn(&role_name), input.role_arn);
        }
        event => panic!("unexpected event: {:?}", event),
    }
}

#[tokio::test]
async fn create_missing_repository() {
    init_logger();
    let (mut manager, mut receiver) = cloud().function_manager();

    let request = CreationRequest::new("f1", "other");
    assert_eq!(
        Err(LambdaCreatorError::not_found(ResourceKind::Repository, "other")),
        manager.create(request).await
    );
    assert_eq!(vec![MockEvent::DescribeRepository("other".to_string())], drain(&mut receiver));
}

#[tokio::test]
async fn create_missing_role() {
    init_logger();
    let (mut manager, mut receiver) = cloud().function_manager();

    let mut request = creation_request();
    request.role_name = Some("missing".to_string());
    assert_eq!(
        Err(LambdaCreatorError::not_found(ResourceKind::Role, "missing")),
        manager.create(request).await
    );
    assert_eq!(
        vec![
            MockEvent::DescribeRepository("repo".to_string()),
            MockEvent::GetRole("missing".to_string())
        ],
        drain(&mut receiver)
    );
}

#[tokio::test]
async fn create_rejected() {
    init_logger();
    let (mut manager, mut receiver) = cloud().rejecting("CreateFunction").function_manager();

    match manager.create(creation_request()).await {
        Err(LambdaCreatorError::RemoteRejection(err)) => {
            assert_eq!("CreateFunction", err.operation);
            assert_eq!("AccessDeniedException", err.summary);
        }
        res => panic!("unexpected result: {:?}", res),
    }
    assert_eq!(3, drain(&mut receiver).len());
}

#[tokio::test]
async fn create_omits_empty_network_placement() {
    init_logger();
    let (mut manager, mut receiver) = cloud().function_manager();

    let mut request = creation_request();
    request.vpc_config = Some(VpcConfig::default());
    manager.create(request).await.unwrap();

    let events = drain(&mut receiver);
    assert_eq!(3, events.len());
    match &events[2] {
        MockEvent::CreateFunction(input) => {
            assert!(input.vpc_config.is_none());
            assert!(input.environment.is_none());
        }
        event => panic!("unexpected event: {:?}", event),
    }
}

#[tokio::test]
async fn create_or_replace_existing() {
    init_logger();
    let (mut manager, mut receiver) = cloud().with_functions(&["f1"]).function_manager();

    manager.create_or_replace(creation_request()).await.unwrap();

    let events = drain(&mut receiver);
    assert_eq!(5, events.len());
    assert_eq!(MockEvent::DescribeRepository("repo".to_string()), events[0]);
    assert_eq!(MockEvent::GetFunction("f1".to_string()), events[1]);
    assert_eq!(MockEvent::DeleteFunction("f1".to_string()), events[2]);
    assert_eq!(MockEvent::GetRole("exec".to_string()), events[3]);
    assert!(matches!(events[4], MockEvent::CreateFunction(_)));
}

#[tokio::test]
async fn create_or_replace_absent() {
    init_logger();
    let (mut manager, mut receiver) = cloud().function_manager();

    manager.create_or_replace(creation_request()).await.unwrap();

    let events = drain(&mut receiver);
    assert_eq!(4, events.len());
    assert_eq!(MockEvent::GetFunction("f1".to_string()), events[1]);
    assert!(matches!(events[3], MockEvent::CreateFunction(_)));
}

#[tokio::test]
async fn create_or_replace_missing_repository_keeps_function() {
    init_logger();
    let (mut manager, mut receiver) = cloud().with_functions(&["f1"]).function_manager();

    let mut request = creation_request();
    request.repository_name = "other".to_string();
    assert!(manager.create_or_replace(request).await.unwrap_err().is_not_found());
    assert_eq!(vec![MockEvent::DescribeRepository("other".to_string())], drain(&mut receiver));
}

#[tokio::test]
async fn update_image_only() {
    init_logger();
    let (mut manager, mut receiver) = cloud().with_functions(&["f1"]).function_manager();

    let mut request = UpdateRequest::new("f1");
    request.repository_name = Some("repo".to_string());
    match manager.update(request).await.unwrap() {
        UpdateResponse::Unchanged(descriptor) => assert_eq!(Some("f1".to_string()), descriptor.configuration.function_name),
        res => panic!("unexpected result: {:?}", res),
    }

    assert_eq!(
        vec![
            MockEvent::DescribeRepository("repo".to_string()),
            MockEvent::UpdateFunctionCode("f1".to_string(), ImageReference::new(REPOSITORY_URI, "latest")),
            MockEvent::GetFunction("f1".to_string()),
        ],
        drain(&mut receiver)
    );
}

#[tokio::test]
async fn update_configuration() {
    init_logger();
    let (mut manager, mut receiver) = cloud().with_functions(&["f1"]).function_manager();

    let mut request = UpdateRequest::new("f1");
    request.role_name = Some("exec".to_string());
    request.memory_size = Some(512);
    request.timeout = Some(60);
    match manager.update(request).await.unwrap() {
        UpdateResponse::Configured(configuration) => {
            assert_eq!(Some(512), configuration.memory_size);
            assert_eq!(Some(60), configuration.timeout);
        }
        res => panic!("unexpected result: {:?}", res),
    }

    let mut expected = ConfigurationUpdate::empty("f1");
    expected.role_arn = Some(role_arn("exec"));
    expected.memory_size = Some(512);
    expected.timeout = Some(60);
    assert_eq!(
        vec![
            MockEvent::GetRole("exec".to_string()),
            MockEvent::UpdateFunctionConfiguration(expected)
        ],
        drain(&mut receiver)
    );
}

#[tokio::test]
async fn update_with_empty_values_is_noop() {
    init_logger();
    let (mut manager, mut receiver) = cloud().with_functions(&["f1"]).function_manager();

    let mut request = UpdateRequest::new("f1");
    request.environment = Some(std::collections::HashMap::new());
    request.description = Some(String::new());
    request.vpc_config = Some(VpcConfig::default());
    request.role_name = Some(String::new());
    match manager.update(request).await.unwrap() {
        UpdateResponse::Unchanged(descriptor) => assert_eq!(Some("f1".to_string()), descriptor.configuration.function_name),
        res => panic!("unexpected result: {:?}", res),
    }

    let events = drain(&mut receiver);
    assert_eq!(vec![MockEvent::GetFunction("f1".to_string())], events);
    assert!(!events.iter().any(|event| matches!(event, MockEvent::UpdateFunctionConfiguration(_))));
}

#[tokio::test]
async fn update_keeps_non_empty_values() {
    init_logger();
    let (mut manager, mut receiver) = cloud().with_functions(&["f1"]).function_manager();

    let mut request = UpdateRequest::new("f1");
    request.environment = Some(std::collections::HashMap::from([("ENV".to_string(), "prod".to_string())]));
    request.description = Some(String::new());
    manager.update(request).await.unwrap();

    let mut expected = ConfigurationUpdate::empty("f1");
    expected.environment = Some(std::collections::HashMap::from([("ENV".to_string(), "prod".to_string())]));
    assert_eq!(vec![MockEvent::UpdateFunctionConfiguration(expected)], drain(&mut receiver));
}

#[tokio::test]
async fn update_image_and_configuration() {
    init_logger();
    let (mut manager, mut receiver) = cloud().with_functions(&["f1"]).function_manager();

    let mut request = UpdateRequest::new("f1");
    request.repository_name = Some("repo".to_string());
    request.image_tag = "v3".to_string();
    request.description = Some("new".to_string());
    assert!(matches!(manager.update(request).await.unwrap(), UpdateResponse::Configured(_)));

    let events = drain(&mut receiver);
    assert_eq!(3, events.len());
    assert_eq!(
        MockEvent::UpdateFunctionCode("f1".to_string(), ImageReference::new(REPOSITORY_URI, "v3")),
        events[1]
    );
    assert!(matches!(&events[2], MockEvent::UpdateFunctionConfiguration(update) if update.description == Some("new".to_string())));
}

#[tokio::test]
async fn update_resolves_before_changing() {
    init_logger();
    let (mut manager, mut receiver) = cloud().with_functions(&["f1"]).function_manager();

    let mut request = UpdateRequest::new("f1");
    request.repository_name = Some("repo".to_string());
    request.role_name = Some("missing".to_string());
    assert_eq!(
        Err(LambdaCreatorError::not_found(ResourceKind::Role, "missing")),
        manager.update(request).await
    );
    // No compute call was issued.
    assert_eq!(
        vec![
            MockEvent::DescribeRepository("repo".to_string()),
            MockEvent::GetRole("missing".to_string())
        ],
        drain(&mut receiver)
    );
}

#[tokio::test]
async fn update_missing_function() {
    init_logger();
    let (mut manager, _receiver) = cloud().function_manager();

    let mut request = UpdateRequest::new("f1");
    request.timeout = Some(10);
    assert_eq!(
        Err(LambdaCreatorError::not_found(ResourceKind::Function, "f1")),
        manager.update(request).await
    );
}

#[tokio::test]
async fn invoke_json_response() {
    init_logger();
    let mut cloud = cloud().with_functions(&["f1"]);
    cloud.invoke_payload = Some(br#"{"statusCode": 200, "body": "ok"}"#.to_vec());
    let (mut manager, mut receiver) = cloud.function_manager();

    let result = manager
        .invoke("f1", Some(serde_json::json!({"key": "value"})), InvocationType::RequestResponse)
        .await
        .unwrap();
    assert_eq!(200, result.status_code);
    assert_eq!(Some("$LATEST".to_string()), result.executed_version);
    assert_eq!(
        Some(ResponsePayload::Json(serde_json::json!({"statusCode": 200, "body": "ok"}))),
        result.response_payload
    );

    assert_eq!(
        vec![MockEvent::Invoke(
            "f1".to_string(),
            InvocationType::RequestResponse,
            Some(br#"{"key":"value"}"#.to_vec())
        )],
        drain(&mut receiver)
    );
}

#[tokio::test]
async fn invoke_text_response() {
    init_logger();
    let mut cloud = cloud().with_functions(&["f1"]);
    cloud.invoke_payload = Some(b"hello world".to_vec());
    let (mut manager, _receiver) = cloud.function_manager();

    let result = manager.invoke("f1", None, InvocationType::RequestResponse).await.unwrap();
    assert_eq!(Some(ResponsePayload::Text("hello world".to_string())), result.response_payload);
}

#[tokio::test]
async fn invoke_event() {
    init_logger();
    let (mut manager, mut receiver) = cloud().with_functions(&["f1"]).function_manager();

    let result = manager.invoke("f1", None, InvocationType::Event).await.unwrap();
    assert_eq!(202, result.status_code);
    assert!(result.response_payload.is_none());
    assert_eq!(
        vec![MockEvent::Invoke("f1".to_string(), InvocationType::Event, None)],
        drain(&mut receiver)
    );
}

#[test]
fn test_decode_payload() {
    assert_eq!(None, decode_payload(None));
    assert_eq!(None, decode_payload(Some(vec![])));
    assert_eq!(Some(ResponsePayload::Json(serde_json::json!(42))), decode_payload(Some(b"42".to_vec())));
    assert_eq!(
        Some(ResponsePayload::Text("{broken".to_string())),
        decode_payload(Some(b"{broken".to_vec()))
    );
}

#[tokio::test]
async fn get_and_delete() {
    init_logger();
    let (mut manager, mut receiver) = cloud().with_functions(&["f1"]).function_manager();

    let descriptor = manager.get("f1").await.unwrap();
    assert_eq!(Some("Image".to_string()), descriptor.configuration.package_type);

    let res = manager.delete("f1").await.unwrap();
    assert!(res.deleted);
    assert_eq!(
        Err(LambdaCreatorError::not_found(ResourceKind::Function, "f1")),
        manager.delete("f1").await
    );
    assert_eq!(
        Err(LambdaCreatorError::not_found(ResourceKind::Function, "f2")),
        manager.get("f2").await
    );
    assert_eq!(4, drain(&mut receiver).len());
}

fn many_functions(count: usize) -> MockCloud {
    let names: Vec<String> = (0..count).map(|i| format!("f{}", i)).collect();
    let names: Vec<&str> = names.iter().map(|name| name.as_str()).collect();
    cloud().with_functions(&names)
}

#[tokio::test]
async fn list_follows_markers() {
    init_logger();
    let (mut manager, mut receiver) = many_functions(120).function_manager();

    let functions = manager.list(120).await.unwrap();
    assert_eq!(120, functions.len());
    assert_eq!(Some("f119".to_string()), functions[119].function_name);
    assert_eq!(
        vec![
            MockEvent::ListFunctions(None, 50),
            MockEvent::ListFunctions(Some("50".to_string()), 50),
            MockEvent::ListFunctions(Some("100".to_string()), 20),
        ],
        drain(&mut receiver)
    );
}

#[tokio::test]
async fn list_bounded() {
    init_logger();
    let (mut manager, mut receiver) = many_functions(7).function_manager();

    assert_eq!(5, manager.list(5).await.unwrap().len());
    assert_eq!(vec![MockEvent::ListFunctions(None, 5)], drain(&mut receiver));

    assert_eq!(7, manager.list(50).await.unwrap().len());
    assert_eq!(vec![MockEvent::ListFunctions(None, 50)], drain(&mut receiver));

    assert!(manager.list(0).await.unwrap().is_empty());
    assert!(drain(&mut receiver).is_empty());
}
