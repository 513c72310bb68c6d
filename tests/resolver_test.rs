mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use common::factories::{Factory, MetadataOptions, TokenInputOptions};
use metadata_rescue::provider;
use metadata_rescue::{
    find_metadata, Metadata, MetadataProvider, MetadataResolver, ProviderError, TokenInput,
};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Start(&'static str),
    Settle(&'static str),
}

/// Sleeps before answering so overlapping calls would show up in the log.
struct SlowProvider {
    name: &'static str,
    delay: Duration,
    answer: Option<Metadata>,
    events: Arc<Mutex<Vec<Event>>>,
}

impl SlowProvider {
    fn boxed(
        name: &'static str,
        delay_ms: u64,
        answer: Option<Metadata>,
        events: &Arc<Mutex<Vec<Event>>>,
    ) -> Box<dyn MetadataProvider> {
        Box::new(SlowProvider {
            name,
            delay: Duration::from_millis(delay_ms),
            answer,
            events: events.clone(),
        })
    }
}

#[async_trait]
impl MetadataProvider for SlowProvider {
    async fn fetch(&self, _token: &TokenInput) -> Result<Metadata, ProviderError> {
        self.events.lock().unwrap().push(Event::Start(self.name));
        tokio::time::sleep(self.delay).await;
        self.events.lock().unwrap().push(Event::Settle(self.name));

        self.answer
            .clone()
            .ok_or_else(|| ProviderError::other(format!("{} found nothing", self.name)))
    }

    fn provider_name(&self) -> &'static str {
        self.name
    }
}

async fn unsupported_chain(token: TokenInput) -> Result<Metadata, ProviderError> {
    Err(ProviderError::unsupported("unsupported_chain", token.chain_id))
}

async fn cat_one(_token: TokenInput) -> Result<Metadata, ProviderError> {
    Ok(Metadata {
        name: "Cat #1".to_string(),
        image_url: "https://img/1.png".to_string(),
    })
}

async fn never_called(_token: TokenInput) -> Result<Metadata, ProviderError> {
    panic!("provider after the first success must not be invoked")
}

#[test_log::test(tokio::test)]
async fn test_fallback_to_second_provider() {
    let mut resolver = MetadataResolver::new();
    resolver.add_provider(provider!(unsupported_chain));
    resolver.add_provider(provider!(cat_one));
    resolver.add_provider(provider!(never_called));

    let result = resolver.resolve(&TokenInput::build_default()).await;

    assert_eq!(
        result,
        Some(Metadata {
            name: "Cat #1".to_string(),
            image_url: "https://img/1.png".to_string(),
        })
    );
}

#[tokio::test]
async fn test_all_providers_fail() {
    let events = Arc::new(Mutex::new(vec![]));
    let resolver = MetadataResolver::new()
        .with_provider(SlowProvider::boxed("p1", 5, None, &events))
        .with_provider(SlowProvider::boxed("p2", 5, None, &events));

    let report = resolver
        .resolve_with_report(&TokenInput::build_default())
        .await;

    assert!(report.metadata.is_none());
    assert_eq!(
        report.attempts.iter().map(|a| a.provider).collect::<Vec<_>>(),
        vec!["p1", "p2"]
    );
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            Event::Start("p1"),
            Event::Settle("p1"),
            Event::Start("p2"),
            Event::Settle("p2"),
        ]
    );
}

#[tokio::test]
async fn test_empty_provider_list() {
    let resolver = MetadataResolver::new();
    assert_eq!(resolver.resolve(&TokenInput::build_default()).await, None);
    assert_eq!(find_metadata(&[], &TokenInput::build_default()).await, None);
}

#[tokio::test]
async fn test_providers_run_one_at_a_time() {
    let events = Arc::new(Mutex::new(vec![]));
    let answer = Metadata::build(MetadataOptions::default());

    // the slow first provider would finish last if anything ran in parallel
    let resolver = MetadataResolver::new()
        .with_provider(SlowProvider::boxed("slow", 30, None, &events))
        .with_provider(SlowProvider::boxed("fast", 1, None, &events))
        .with_provider(SlowProvider::boxed("hit", 1, Some(answer.clone()), &events))
        .with_provider(SlowProvider::boxed("skipped", 1, None, &events));

    let result = resolver.resolve(&TokenInput::build_default()).await;

    assert_eq!(result, Some(answer));
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            Event::Start("slow"),
            Event::Settle("slow"),
            Event::Start("fast"),
            Event::Settle("fast"),
            Event::Start("hit"),
            Event::Settle("hit"),
        ]
    );
}

#[tokio::test]
async fn test_shared_resolver_across_tasks() {
    let resolver = Arc::new(MetadataResolver::new().with_provider(provider!(cat_one)));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let resolver = resolver.clone();
            tokio::spawn(async move {
                let token = TokenInput::build(TokenInputOptions {
                    token_id: Some(i),
                    ..Default::default()
                });
                resolver.resolve(&token).await
            })
        })
        .collect();

    for handle in handles {
        let result = handle.await.unwrap();
        assert_eq!(result.unwrap().name, "Cat #1");
    }
}

#[tokio::test]
async fn test_report_separates_unsupported_from_failures() {
    let events = Arc::new(Mutex::new(vec![]));
    let resolver = MetadataResolver::new()
        .with_provider(provider!(unsupported_chain))
        .with_provider(SlowProvider::boxed("p2", 1, None, &events));

    let report = resolver
        .resolve_with_report(&TokenInput::build(TokenInputOptions {
            chain_id: Some(137),
            ..Default::default()
        }))
        .await;

    let errors: Vec<_> = report.errors().collect();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].1.is_unsupported());
    assert!(!errors[1].1.is_unsupported());
    assert_eq!(
        report.summary(),
        "unsupported_chain: Error (chain 137 not supported by unsupported_chain)\np2: Error (p2 found nothing)"
    );
}
