mod helpers;

use babel::entry::{EntryType, TypeFilter, ViewIntent};
use babel::sync::QueryOutcome;
use babel::BabelError;
use helpers::{entry, ids, library, FakeRepository};

fn sample() -> Vec<babel::entry::Entry> {
    vec![
        entry("3", EntryType::Concept, "Map and territory", "A metaphor about models"),
        entry("2", EntryType::Word, "Metaphor", "A figure of speech"),
        entry("1", EntryType::Author, "Borges", "Wrote the library"),
    ]
}

#[tokio::test]
async fn full_listing_uses_list_all_and_search_uses_search() {
    let repo = FakeRepository::with_entries(sample());
    let lib = library(&repo);

    let outcome = lib.queries.refresh().await.unwrap();
    assert_eq!(outcome, QueryOutcome::Applied { seq: 1, count: 3 });
    assert_eq!(repo.list_calls(), 1);

    lib.queries.set_term("metaphor").await.unwrap();
    assert_eq!(repo.search_calls(), 1);
    assert_eq!(ids(&lib.session.entries()), ["3", "2"]);

    // Type filter alone is still a search
    lib.queries
        .set_intent(ViewIntent::new("", TypeFilter::Only(EntryType::Author)))
        .await
        .unwrap();
    assert_eq!(repo.search_calls(), 2);
    assert_eq!(ids(&lib.session.entries()), ["1"]);
}

#[tokio::test]
async fn older_query_finishing_last_is_discarded() {
    let repo = FakeRepository::with_entries(sample());
    let lib = library(&repo);

    let release_stale = repo.gate();
    let release_latest = repo.gate();

    let stale = tokio::spawn({
        let queries = lib.queries.clone();
        async move {
            queries
                .set_intent(ViewIntent::new("metaphor", TypeFilter::Only(EntryType::Word)))
                .await
        }
    });
    repo.wait_for_queries(1).await;

    let latest = tokio::spawn({
        let queries = lib.queries.clone();
        async move { queries.set_intent(ViewIntent::new("", TypeFilter::All)).await }
    });
    repo.wait_for_queries(2).await;
    assert!(lib.session.is_loading());

    release_latest.send(()).unwrap();
    let latest = latest.await.unwrap().unwrap();
    assert_eq!(latest, QueryOutcome::Applied { seq: 2, count: 3 });

    release_stale.send(()).unwrap();
    let stale = stale.await.unwrap().unwrap();
    assert_eq!(stale, QueryOutcome::Superseded { seq: 1 });

    assert_eq!(ids(&lib.session.entries()), ["3", "2", "1"]);
    assert_eq!(lib.session.applied_seq(), Some(2));
    assert!(!lib.session.is_loading());
}

#[tokio::test]
async fn older_query_finishing_first_is_overwritten() {
    let repo = FakeRepository::with_entries(sample());
    let lib = library(&repo);

    let release_stale = repo.gate();
    let release_latest = repo.gate();

    let stale = tokio::spawn({
        let queries = lib.queries.clone();
        async move { queries.set_term("borges").await }
    });
    repo.wait_for_queries(1).await;
    let latest = tokio::spawn({
        let queries = lib.queries.clone();
        async move { queries.set_term("metaphor").await }
    });
    repo.wait_for_queries(2).await;

    release_stale.send(()).unwrap();
    assert_eq!(stale.await.unwrap().unwrap(), QueryOutcome::Superseded { seq: 1 });
    // Nothing from the stale answer was shown
    assert!(lib.session.is_empty());

    release_latest.send(()).unwrap();
    assert_eq!(
        latest.await.unwrap().unwrap(),
        QueryOutcome::Applied { seq: 2, count: 2 }
    );
    assert_eq!(ids(&lib.session.entries()), ["3", "2"]);
}

#[tokio::test]
async fn failed_query_keeps_last_results() {
    let repo = FakeRepository::with_entries(sample());
    let lib = library(&repo);
    lib.queries.refresh().await.unwrap();

    repo.fail_next_query(BabelError::Transport("connection refused".into()));
    let err = lib.queries.set_term("borges").await.unwrap_err();

    assert_eq!(err, BabelError::Transport("connection refused".into()));
    assert_eq!(lib.session.len(), 3);
    assert_eq!(lib.session.applied_seq(), Some(1));
    assert!(!lib.session.is_loading());
    // The failed intent is still the current one, so a retry re-sends it
    assert_eq!(lib.session.intent().term, "borges");
    lib.queries.refresh().await.unwrap();
    assert_eq!(ids(&lib.session.entries()), ["1"]);
}

#[tokio::test]
async fn failure_of_superseded_query_is_silent() {
    let repo = FakeRepository::with_entries(sample());
    let lib = library(&repo);

    repo.fail_next_query(BabelError::Server {
        status: 500,
        message: "boom".into(),
    });
    let release_stale = repo.gate();

    let stale = tokio::spawn({
        let queries = lib.queries.clone();
        async move { queries.set_term("x").await }
    });
    repo.wait_for_queries(1).await;

    lib.queries.set_term("").await.unwrap();
    release_stale.send(()).unwrap();

    assert_eq!(stale.await.unwrap().unwrap(), QueryOutcome::Superseded { seq: 1 });
    assert_eq!(lib.session.len(), 3);
}

#[tokio::test]
async fn identical_pending_intent_is_coalesced() {
    let repo = FakeRepository::with_entries(sample());
    let lib = library(&repo);

    let release = repo.gate();
    let first = tokio::spawn({
        let queries = lib.queries.clone();
        async move { queries.set_term("metaphor").await }
    });
    repo.wait_for_queries(1).await;

    // Surrounding whitespace does not make it a different intent
    let second = lib.queries.set_term("  metaphor ").await.unwrap();
    assert_eq!(second, QueryOutcome::Coalesced);
    assert_eq!(repo.query_calls(), 1);

    release.send(()).unwrap();
    assert_eq!(
        first.await.unwrap().unwrap(),
        QueryOutcome::Applied { seq: 1, count: 2 }
    );

    // Once settled, the same intent is queried again
    lib.queries.set_term("metaphor").await.unwrap();
    assert_eq!(repo.query_calls(), 2);
}

#[tokio::test]
async fn set_type_filter_keeps_term() {
    let repo = FakeRepository::with_entries(sample());
    let lib = library(&repo);

    lib.queries.set_term("metaphor").await.unwrap();
    lib.queries
        .set_type_filter(TypeFilter::Only(EntryType::Word))
        .await
        .unwrap();

    let intent = lib.session.intent();
    assert_eq!(intent.term, "metaphor");
    assert_eq!(intent.type_filter, TypeFilter::Only(EntryType::Word));
    assert_eq!(ids(&lib.session.entries()), ["2"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn spawned_queries_follow_input_order() {
    for _ in 0..200 {
        let repo = FakeRepository::with_entries(sample());
        let lib = library(&repo);

        // One ticket per typed line, taken before the query task is spawned
        let handles: Vec<_> = [
            lib.queries.begin_term("borges"),
            lib.queries.begin_type_filter(TypeFilter::Only(EntryType::Word)),
            lib.queries.begin_term("metaphor"),
        ]
        .into_iter()
        .map(|ticket| {
            let queries = lib.queries.clone();
            let ticket = ticket.expect("each line changes the intent");
            tokio::spawn(async move { queries.run(ticket).await })
        })
        .collect();

        let mut applied = 0;
        for handle in handles {
            if let QueryOutcome::Applied { seq, .. } = handle.await.unwrap().unwrap() {
                assert_eq!(seq, 3);
                applied += 1;
            }
        }

        assert_eq!(applied, 1);
        assert_eq!(
            lib.session.intent(),
            ViewIntent::new("metaphor", TypeFilter::Only(EntryType::Word))
        );
        assert_eq!(ids(&lib.session.entries()), ["2"]);
    }
}
