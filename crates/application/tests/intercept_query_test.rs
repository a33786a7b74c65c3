mod helpers;

use dns_intercept_application::ports::DnsHandler;
use dns_intercept_application::use_cases::{InterceptQueryUseCase, TerminalHandler};
use dns_intercept_domain::{
    parse_directives, DnsClass, DnsRequest, DnsResponse, RecordData, RecordType, ResponseCode,
};
use helpers::mock_handlers::{MockNextHandler, RecordingSink};
use std::sync::Arc;

fn use_case(rules: &str, next: &MockNextHandler) -> InterceptQueryUseCase {
    let table = parse_directives(rules, &[]).unwrap();
    InterceptQueryUseCase::new(Arc::new(table), Arc::new(next.clone()))
}

fn request(name: &str, record_type: RecordType, source: &str) -> DnsRequest {
    DnsRequest::new(name, DnsClass::IN, record_type, source.parse().unwrap())
}

const PRIVATE_A: &str = "intercept example.org {
    record 3600 IN A 127.0.0.2 net 192.168.0.0/16
}";

#[tokio::test]
async fn test_intercepts_address_query_from_listed_network() {
    let next = MockNextHandler::new();
    let handler = use_case(PRIVATE_A, &next);
    let mut sink = RecordingSink::new();

    let code = handler
        .serve(&request("www.example.org.", RecordType::A, "192.168.0.2"), &mut sink)
        .await
        .unwrap();

    assert_eq!(code, ResponseCode::NoError);
    assert_eq!(next.calls(), 0);
    assert_eq!(sink.written.len(), 1);

    let response = &sink.written[0];
    assert!(response.authoritative);
    assert!(!response.recursion_available);
    assert_eq!(response.response_code, ResponseCode::NoError);
    assert_eq!(response.answers.len(), 1);

    let record = &response.answers[0];
    assert_eq!(&*record.owner, "www.example.org.");
    assert_eq!(record.class, DnsClass::IN);
    assert_eq!(record.ttl, 3600);
    assert_eq!(record.data, RecordData::A("127.0.0.2".parse().unwrap()));
}

#[tokio::test]
async fn test_unlisted_source_falls_through_unchanged() {
    let next = MockNextHandler::returning(ResponseCode::NxDomain);
    let handler = use_case(PRIVATE_A, &next);
    let mut sink = RecordingSink::new();

    let code = handler
        .serve(&request("www.example.org.", RecordType::A, "10.0.0.1"), &mut sink)
        .await
        .unwrap();

    assert_eq!(code, ResponseCode::NxDomain);
    assert_eq!(next.calls(), 1);
    assert!(sink.written.is_empty());

    let forwarded = next.seen();
    assert_eq!(&*forwarded[0].domain, "www.example.org.");
    assert_eq!(forwarded[0].record_type, RecordType::A);
}

#[tokio::test]
async fn test_intercepts_reverse_lookup() {
    let next = MockNextHandler::new();
    let handler = use_case(
        "intercept 1.168.192.in-addr.arpa {\n record 600 IN PTR www.example.org. net 192.168.0.0/16\n}",
        &next,
    );
    let mut sink = RecordingSink::new();

    handler
        .serve(
            &request("1.1.168.192.in-addr.arpa.", RecordType::PTR, "192.168.0.2"),
            &mut sink,
        )
        .await
        .unwrap();

    assert_eq!(next.calls(), 0);
    let answers = &sink.written[0].answers;
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].ttl, 600);
    assert_eq!(answers[0].data, RecordData::Ptr(Arc::from("www.example.org.")));
}

#[tokio::test]
async fn test_non_synthesizable_type_falls_through() {
    let next = MockNextHandler::new();
    let handler = use_case(
        "intercept example.org {\n record 600 IN NS ns1.example.org. net 192.168.0.0/16\n}",
        &next,
    );
    let mut sink = RecordingSink::new();

    let code = handler
        .serve(&request("www.example.org.", RecordType::NS, "192.168.0.2"), &mut sink)
        .await
        .unwrap();

    assert_eq!(code, ResponseCode::ServFail);
    assert_eq!(next.calls(), 1);
    assert!(sink.written.is_empty());
}

#[tokio::test]
async fn test_multiple_answers_keep_declared_order() {
    let next = MockNextHandler::new();
    let handler = use_case(
        "intercept {\n record 3600 IN A 127.0.0.2 127.0.0.3 net 192.168.0.0/16\n}",
        &next,
    );
    let mut sink = RecordingSink::new();

    handler
        .serve(&request("anything.test.", RecordType::A, "192.168.0.2"), &mut sink)
        .await
        .unwrap();

    let answers = &sink.written[0].answers;
    let values: Vec<&RecordData> = answers.iter().map(|r| &r.data).collect();
    assert_eq!(
        values,
        vec![
            &RecordData::A("127.0.0.2".parse().unwrap()),
            &RecordData::A("127.0.0.3".parse().unwrap()),
        ]
    );
    assert!(answers.iter().all(|r| r.ttl == 3600));
}

#[tokio::test]
async fn test_first_matching_policy_wins() {
    let next = MockNextHandler::new();
    let handler = use_case(
        "intercept example.org {
            record 60 IN A 10.1.1.1 net 192.168.1.0/24
            record 60 IN A 10.2.2.2
            record 60 IN A 10.3.3.3
        }",
        &next,
    );

    let mut inside = RecordingSink::new();
    handler
        .serve(&request("a.example.org.", RecordType::A, "192.168.1.7"), &mut inside)
        .await
        .unwrap();
    assert_eq!(
        inside.written[0].answers[0].data,
        RecordData::A("10.1.1.1".parse().unwrap())
    );

    let mut outside = RecordingSink::new();
    handler
        .serve(&request("a.example.org.", RecordType::A, "172.16.0.1"), &mut outside)
        .await
        .unwrap();
    assert_eq!(
        outside.written[0].answers[0].data,
        RecordData::A("10.2.2.2".parse().unwrap())
    );
}

#[tokio::test]
async fn test_wildcard_type_skips_answers_of_the_wrong_shape() {
    let next = MockNextHandler::new();
    let handler = use_case(
        "intercept example.org {
            record 60 IN * host.example.net.
            record 60 IN * 127.0.0.9
        }",
        &next,
    );

    let mut a_sink = RecordingSink::new();
    handler
        .serve(&request("www.example.org.", RecordType::A, "10.0.0.1"), &mut a_sink)
        .await
        .unwrap();
    assert_eq!(
        a_sink.written[0].answers[0].data,
        RecordData::A("127.0.0.9".parse().unwrap())
    );

    let mut ptr_sink = RecordingSink::new();
    handler
        .serve(&request("www.example.org.", RecordType::PTR, "10.0.0.1"), &mut ptr_sink)
        .await
        .unwrap();
    assert_eq!(
        ptr_sink.written[0].answers[0].data,
        RecordData::Ptr(Arc::from("host.example.net."))
    );

    let mut mx_sink = RecordingSink::new();
    handler
        .serve(&request("www.example.org.", RecordType::MX, "10.0.0.1"), &mut mx_sink)
        .await
        .unwrap();
    assert!(mx_sink.written.is_empty());
    assert_eq!(next.calls(), 1);
}

#[tokio::test]
async fn test_later_rule_answers_when_earlier_rule_cannot() {
    let next = MockNextHandler::new();
    let handler = use_case(
        "intercept example.org {\n record 60 IN A 10.0.0.1 net 172.16.0.0/12\n}
intercept org {\n record 60 IN A 10.0.0.2\n}",
        &next,
    );
    let mut sink = RecordingSink::new();

    handler
        .serve(&request("www.example.org.", RecordType::A, "192.168.0.2"), &mut sink)
        .await
        .unwrap();

    assert_eq!(
        sink.written[0].answers[0].data,
        RecordData::A("10.0.0.2".parse().unwrap())
    );
}

#[tokio::test]
async fn test_zone_outside_query_name_is_ignored() {
    let next = MockNextHandler::new();
    let handler = use_case("intercept example.com {\n record 60 IN A 10.0.0.1\n}", &next);
    let mut sink = RecordingSink::new();

    handler
        .serve(&request("www.example.org.", RecordType::A, "10.0.0.1"), &mut sink)
        .await
        .unwrap();

    assert!(sink.written.is_empty());
    assert_eq!(next.calls(), 1);
}

#[tokio::test]
async fn test_class_must_match() {
    let next = MockNextHandler::new();
    let handler = use_case("intercept {\n record 60 CH TXT version\n}", &next);

    let mut in_sink = RecordingSink::new();
    handler
        .serve(&request("version.bind.", RecordType::TXT, "10.0.0.1"), &mut in_sink)
        .await
        .unwrap();
    assert!(in_sink.written.is_empty());

    let chaos = DnsRequest::new(
        "version.bind.",
        DnsClass::CH,
        RecordType::TXT,
        "10.0.0.1".parse().unwrap(),
    );
    let mut ch_sink = RecordingSink::new();
    handler.serve(&chaos, &mut ch_sink).await.unwrap();

    let record = &ch_sink.written[0].answers[0];
    assert_eq!(record.class, DnsClass::CH);
    assert_eq!(record.data, RecordData::Txt(Arc::from("version")));
}

#[tokio::test]
async fn test_ipv6_policy_and_mapped_source() {
    let next = MockNextHandler::new();
    let handler = use_case(
        "intercept example.org {\n record 300 IN AAAA 2001:db8::1 net 192.168.0.0/16 fd00::/8\n}",
        &next,
    );

    for source in ["fd12::5", "::ffff:192.168.3.4"] {
        let mut sink = RecordingSink::new();
        handler
            .serve(&request("v6.example.org.", RecordType::AAAA, source), &mut sink)
            .await
            .unwrap();
        assert_eq!(
            sink.written[0].answers[0].data,
            RecordData::Aaaa("2001:db8::1".parse().unwrap()),
            "source {}",
            source
        );
    }
}

#[tokio::test]
async fn test_sink_failure_is_returned_without_delegating() {
    let next = MockNextHandler::new();
    let handler = use_case(PRIVATE_A, &next);
    let mut sink = RecordingSink::failing();

    let result = handler
        .serve(&request("www.example.org.", RecordType::A, "192.168.0.2"), &mut sink)
        .await;

    assert!(result.is_err());
    assert_eq!(next.calls(), 0);
}

#[tokio::test]
async fn test_resolve_is_deterministic() {
    let next = MockNextHandler::new();
    let handler = use_case(
        "intercept {\n record 60 IN A 127.0.0.2 127.0.0.3 127.0.0.4\n}",
        &next,
    );
    let query = request("x.test.", RecordType::A, "10.0.0.1");

    let first: DnsResponse = handler.resolve(&query).unwrap();
    for _ in 0..10 {
        assert_eq!(handler.resolve(&query).unwrap(), first);
    }
}

#[tokio::test]
async fn test_terminal_handler_writes_only_non_error_codes() {
    let query = request("nothing.test.", RecordType::A, "10.0.0.1");

    let mut servfail_sink = RecordingSink::new();
    let code = TerminalHandler::new(ResponseCode::ServFail)
        .serve(&query, &mut servfail_sink)
        .await
        .unwrap();
    assert_eq!(code, ResponseCode::ServFail);
    assert!(servfail_sink.written.is_empty());

    let mut nxdomain_sink = RecordingSink::new();
    let code = TerminalHandler::new(ResponseCode::NxDomain)
        .serve(&query, &mut nxdomain_sink)
        .await
        .unwrap();
    assert_eq!(code, ResponseCode::NxDomain);
    assert_eq!(
        nxdomain_sink.written,
        vec![DnsResponse::status(ResponseCode::NxDomain)]
    );
}

#[tokio::test]
async fn test_unnamed_type_passes_wildcard_policy_to_next() {
    let next = MockNextHandler::returning(ResponseCode::NxDomain);
    let handler = use_case("intercept example.org {\n record 60 IN * 127.0.0.9\n}", &next);
    let mut sink = RecordingSink::new();

    let code = handler
        .serve(
            &request("www.example.org.", RecordType::Unknown(29), "10.0.0.1"),
            &mut sink,
        )
        .await
        .unwrap();

    assert_eq!(code, ResponseCode::NxDomain);
    assert_eq!(next.calls(), 1);
    assert_eq!(next.seen()[0].record_type, RecordType::Unknown(29));
    assert!(sink.written.is_empty());
}

#[tokio::test]
async fn test_owner_keeps_query_spelling() {
    let next = MockNextHandler::new();
    let handler = use_case(PRIVATE_A, &next);
    let mut sink = RecordingSink::new();

    handler
        .serve(&request("WwW.ExAmple.ORG.", RecordType::A, "192.168.0.2"), &mut sink)
        .await
        .unwrap();

    assert_eq!(&*sink.written[0].answers[0].owner, "WwW.ExAmple.ORG.");
}
