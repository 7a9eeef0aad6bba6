//! End-to-end tests of the generation and scheduling pipeline over the
//! in-memory store, with a scripted text generator and a manual clock.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Days, Duration, NaiveDate, TimeZone, Utc};
use tokio::sync::Notify;
use uuid::Uuid;

use cadence_core::domain::{
    BrandProfile, GenerationPolicy, Post, PostStatus, UsageDelta, UsageRecord,
};
use cadence_core::error::{GenerationError, PipelineError, RepoError};
use cadence_core::ports::{
    BaseRepository, ManualClock, PostRepository, ProfileRepository, TextGenerator,
    UsageRepository,
};
use cadence_core::services::{
    ContentGenerator, ModerationFilter, PipelineOrchestrator, SchedulingEngine, SweepOutcome,
    UsageMeter,
};
use cadence_infra::{InMemoryPostRepository, InMemoryProfileRepository, InMemoryUsageRepository};

struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
}

impl ScriptedGenerator {
    fn new(replies: impl IntoIterator<Item = Result<String, GenerationError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
        })
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected generation call")
    }
}

/// Post store whose inserts always fail.
struct BrokenPostRepository;

#[async_trait]
impl PostRepository for BrokenPostRepository {
    async fn insert_batch(&self, _posts: Vec<Post>) -> Result<Vec<Post>, RepoError> {
        Err(RepoError::Connection("connection reset".into()))
    }

    async fn find_by_id(&self, _org: Uuid, _id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(None)
    }

    async fn list(&self, _org: Uuid, _s: Option<PostStatus>) -> Result<Vec<Post>, RepoError> {
        Ok(Vec::new())
    }

    async fn schedule(
        &self,
        _org: Uuid,
        _id: Uuid,
        _at: DateTime<Utc>,
        _now: DateTime<Utc>,
    ) -> Result<u64, RepoError> {
        Ok(0)
    }

    async fn publish_due(&self, _org: Option<Uuid>, _now: DateTime<Utc>) -> Result<u64, RepoError> {
        Err(RepoError::Connection("connection reset".into()))
    }
}

/// Usage store whose writes always fail.
struct BrokenUsageRepository;

#[async_trait]
impl UsageRepository for BrokenUsageRepository {
    async fn increment(
        &self,
        _org: Uuid,
        _month: NaiveDate,
        _delta: UsageDelta,
        _now: DateTime<Utc>,
    ) -> Result<UsageRecord, RepoError> {
        Err(RepoError::Query("deadlock detected".into()))
    }

    async fn find(&self, _org: Uuid, _month: NaiveDate) -> Result<Option<UsageRecord>, RepoError> {
        Ok(None)
    }
}

/// Post store whose publish step waits until released.
struct GatedPostRepository {
    inner: InMemoryPostRepository,
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl PostRepository for GatedPostRepository {
    async fn insert_batch(&self, posts: Vec<Post>) -> Result<Vec<Post>, RepoError> {
        self.inner.insert_batch(posts).await
    }

    async fn find_by_id(&self, org: Uuid, id: Uuid) -> Result<Option<Post>, RepoError> {
        self.inner.find_by_id(org, id).await
    }

    async fn list(&self, org: Uuid, s: Option<PostStatus>) -> Result<Vec<Post>, RepoError> {
        self.inner.list(org, s).await
    }

    async fn schedule(
        &self,
        org: Uuid,
        id: Uuid,
        at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<u64, RepoError> {
        self.inner.schedule(org, id, at, now).await
    }

    async fn publish_due(&self, org: Option<Uuid>, now: DateTime<Utc>) -> Result<u64, RepoError> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.publish_due(org, now).await
    }
}

struct Harness {
    pipeline: PipelineOrchestrator,
    scheduling: SchedulingEngine,
    usage: Arc<UsageMeter>,
    profiles: Arc<InMemoryProfileRepository>,
    clock: Arc<ManualClock>,
}

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 9, 30, 0).unwrap()
}

fn harness_with(
    generator: Arc<ScriptedGenerator>,
    posts: Arc<dyn PostRepository>,
) -> Harness {
    harness_over(generator, posts, Arc::new(InMemoryUsageRepository::new()))
}

fn harness_over(
    generator: Arc<ScriptedGenerator>,
    posts: Arc<dyn PostRepository>,
    usage: Arc<dyn UsageRepository>,
) -> Harness {
    let clock = Arc::new(ManualClock::new(start_time()));
    let profiles = Arc::new(InMemoryProfileRepository::new());
    let usage = Arc::new(UsageMeter::new(usage, clock.clone()));

    let pipeline = PipelineOrchestrator::new(
        profiles.clone() as Arc<dyn ProfileRepository>,
        posts.clone(),
        ContentGenerator::new(generator),
        ModerationFilter::new(["scam", "hate"]),
        usage.clone(),
        GenerationPolicy::default(),
        clock.clone(),
    );
    let scheduling = SchedulingEngine::new(posts, clock.clone());

    Harness {
        pipeline,
        scheduling,
        usage,
        profiles,
        clock,
    }
}

fn harness(generator: Arc<ScriptedGenerator>) -> Harness {
    harness_with(generator, Arc::new(InMemoryPostRepository::new()))
}

async fn with_acme_profile(h: &Harness) -> Uuid {
    let organization_id = Uuid::new_v4();
    h.profiles
        .save(BrandProfile {
            company_name: Some("Acme".into()),
            tone: Some("cheerful".into()),
            ..BrandProfile::new(organization_id)
        })
        .await
        .unwrap();
    organization_id
}

fn items_json(texts: &[&str]) -> String {
    let items: Vec<_> = texts
        .iter()
        .map(|t| serde_json::json!({"text": t, "hashtags": ["#acme"], "imagePrompt": "sunny shop"}))
        .collect();
    serde_json::to_string(&items).unwrap()
}

#[tokio::test]
async fn scenario_a_three_drafts_staggered_and_metered() {
    let texts = ["Good morning from Acme!", "Meet the team", "Weekend sale starts now"];
    let h = harness(ScriptedGenerator::new([Ok(items_json(&texts))]));
    let org = with_acme_profile(&h).await;

    let posts = h.pipeline.generate_and_persist(org, Some(3)).await.unwrap();

    assert_eq!(posts.len(), 3);
    for (index, post) in posts.iter().enumerate() {
        assert_eq!(post.text, texts[index]);
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.organization_id, org);
        assert_eq!(post.hashtags, vec!["#acme"]);
        assert!(!post.flagged);
        let expected = post.created_at.date_naive() + Days::new(index as u64);
        assert_eq!(post.scheduled_at.unwrap().date_naive(), expected);
    }

    let stored = h.scheduling.posts(org, Some(PostStatus::Draft)).await.unwrap();
    assert_eq!(stored.len(), 3);

    let usage = h.usage.usage(org, None).await.unwrap();
    let expected_tokens: usize = texts.iter().map(|t| t.chars().count()).sum();
    assert_eq!(usage.tokens_used, expected_tokens as i64);
    assert_eq!(usage.images_generated, 0);
}

#[tokio::test]
async fn requested_count_is_clamped_before_generation() {
    let texts: Vec<String> = (0..12).map(|i| format!("post {i}")).collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let h = harness(ScriptedGenerator::new([Ok(items_json(&refs)), Ok(items_json(&refs))]));
    let org = with_acme_profile(&h).await;

    let posts = h.pipeline.generate_and_persist(org, Some(50)).await.unwrap();
    assert_eq!(posts.len(), GenerationPolicy::default().max_count());

    let posts = h.pipeline.generate_and_persist(org, None).await.unwrap();
    assert_eq!(posts.len(), GenerationPolicy::DEFAULT_COUNT);
}

#[tokio::test]
async fn flagged_drafts_are_still_persisted() {
    let h = harness(ScriptedGenerator::new([Ok(items_json(&[
        "Totally not a SCAM",
        "Lovely spring flowers",
    ]))]));
    let org = with_acme_profile(&h).await;

    let posts = h.pipeline.generate_and_persist(org, Some(2)).await.unwrap();

    assert!(posts[0].flagged);
    assert!(!posts[1].flagged);
    assert_eq!(h.scheduling.posts(org, None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn scenario_c_malformed_output_yields_single_raw_draft() {
    let raw = "```json\n[{\"text\": \"Half a post\", \"hashtags\": [\n```";
    let h = harness(ScriptedGenerator::new([Ok(raw.to_string())]));
    let org = with_acme_profile(&h).await;

    let posts = h.pipeline.generate_and_persist(org, Some(3)).await.unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].text, "[{\"text\": \"Half a post\", \"hashtags\": [");
    assert!(posts[0].hashtags.is_empty());
    assert_eq!(posts[0].status, PostStatus::Draft);
}

#[tokio::test]
async fn missing_profile_is_reported() {
    let h = harness(ScriptedGenerator::new([]));
    let org = Uuid::new_v4();

    let err = h.pipeline.generate_and_persist(org, Some(3)).await.unwrap_err();

    assert!(matches!(err, PipelineError::ProfileNotFound(id) if id == org));
}

#[tokio::test]
async fn upstream_and_configuration_errors_propagate_without_side_effects() {
    let h = harness(ScriptedGenerator::new([
        Err(GenerationError::Upstream {
            status: Some(503),
            message: "overloaded".into(),
        }),
        Err(GenerationError::Configuration("no key".into())),
    ]));
    let org = with_acme_profile(&h).await;

    let err = h.pipeline.generate_and_persist(org, Some(3)).await.unwrap_err();
    assert!(matches!(err, PipelineError::Upstream { status: Some(503), .. }));

    let err = h.pipeline.generate_and_persist(org, Some(3)).await.unwrap_err();
    assert!(matches!(err, PipelineError::Configuration(_)));

    assert!(h.scheduling.posts(org, None).await.unwrap().is_empty());
    assert_eq!(h.usage.usage(org, None).await.unwrap().tokens_used, 0);
}

#[tokio::test]
async fn persistence_failure_is_surfaced_and_not_metered() {
    let h = harness_with(
        ScriptedGenerator::new([Ok(items_json(&["one", "two"]))]),
        Arc::new(BrokenPostRepository),
    );
    let org = with_acme_profile(&h).await;

    let err = h.pipeline.generate_and_persist(org, Some(2)).await.unwrap_err();

    assert!(matches!(err, PipelineError::Persistence(_)));
    assert_eq!(h.usage.usage(org, None).await.unwrap().tokens_used, 0);
}

#[tokio::test]
async fn usage_failure_after_persist_keeps_the_drafts() {
    let h = harness_over(
        ScriptedGenerator::new([Ok(items_json(&["one", "two"]))]),
        Arc::new(InMemoryPostRepository::new()),
        Arc::new(BrokenUsageRepository),
    );
    let org = with_acme_profile(&h).await;

    let err = h.pipeline.generate_and_persist(org, Some(2)).await.unwrap_err();

    assert!(matches!(err, PipelineError::Persistence(RepoError::Query(_))));
    let stored = h.scheduling.posts(org, Some(PostStatus::Draft)).await.unwrap();
    assert_eq!(stored.len(), 2);
}

#[tokio::test]
async fn usage_is_additive_within_a_month() {
    let h = harness(ScriptedGenerator::new([
        Ok(items_json(&["abcd"])),
        Ok(items_json(&["efghij"])),
        Ok(items_json(&["next month"])),
    ]));
    let org = with_acme_profile(&h).await;

    h.pipeline.generate_and_persist(org, Some(1)).await.unwrap();
    h.pipeline.generate_and_persist(org, Some(1)).await.unwrap();
    assert_eq!(h.usage.usage(org, None).await.unwrap().tokens_used, 10);

    h.clock.advance(Duration::days(31));
    h.pipeline.generate_and_persist(org, Some(1)).await.unwrap();

    assert_eq!(h.usage.usage(org, None).await.unwrap().tokens_used, 10);
    let march = start_time().date_naive();
    assert_eq!(h.usage.usage(org, Some(march)).await.unwrap().tokens_used, 10);
}

#[tokio::test]
async fn schedule_moves_draft_and_allows_rescheduling() {
    let h = harness(ScriptedGenerator::new([Ok(items_json(&["hello"]))]));
    let org = with_acme_profile(&h).await;
    let post = h.pipeline.generate_and_persist(org, Some(1)).await.unwrap().remove(0);

    let first = start_time() + Duration::days(2);
    let scheduled = h.scheduling.schedule(org, post.id, first).await.unwrap();
    assert_eq!(scheduled.status, PostStatus::Scheduled);
    assert_eq!(scheduled.scheduled_at, Some(first));

    let second = start_time() + Duration::days(5);
    let rescheduled = h.scheduling.schedule(org, post.id, second).await.unwrap();
    assert_eq!(rescheduled.scheduled_at, Some(second));
}

#[tokio::test]
async fn other_organizations_cannot_touch_a_post() {
    let h = harness(ScriptedGenerator::new([Ok(items_json(&["private"]))]));
    let org = with_acme_profile(&h).await;
    let intruder = Uuid::new_v4();
    let post = h.pipeline.generate_and_persist(org, Some(1)).await.unwrap().remove(0);

    let err = h
        .scheduling
        .schedule(intruder, post.id, start_time())
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::PostNotFound(_)));
    assert!(matches!(
        h.scheduling.post(intruder, post.id).await.unwrap_err(),
        PipelineError::PostNotFound(_)
    ));

    let unchanged = h.scheduling.post(org, post.id).await.unwrap();
    assert_eq!(unchanged.status, PostStatus::Draft);
}

#[tokio::test]
async fn scenario_b_sweep_publishes_only_due_posts() {
    let h = harness(ScriptedGenerator::new([Ok(items_json(&["new year"]))]));
    let org = with_acme_profile(&h).await;
    let post = h.pipeline.generate_and_persist(org, Some(1)).await.unwrap().remove(0);

    let due = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    h.scheduling.schedule(org, post.id, due).await.unwrap();

    h.clock.set(Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap());
    assert_eq!(h.scheduling.sweep().await, SweepOutcome::Published(0));
    assert_eq!(
        h.scheduling.post(org, post.id).await.unwrap().status,
        PostStatus::Scheduled
    );

    h.clock.set(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 1).unwrap());
    assert_eq!(h.scheduling.sweep().await, SweepOutcome::Published(1));
    assert_eq!(
        h.scheduling.post(org, post.id).await.unwrap().status,
        PostStatus::Published
    );
}

#[tokio::test]
async fn publish_due_is_idempotent_and_scoped() {
    let h = harness(ScriptedGenerator::new([
        Ok(items_json(&["a", "b"])),
        Ok(items_json(&["c"])),
    ]));
    let org = with_acme_profile(&h).await;
    let other = with_acme_profile(&h).await;

    let mine = h.pipeline.generate_and_persist(org, Some(2)).await.unwrap();
    let theirs = h.pipeline.generate_and_persist(other, Some(1)).await.unwrap();

    let now = start_time();
    for post in &mine {
        h.scheduling.schedule(org, post.id, now).await.unwrap();
    }
    h.scheduling.schedule(other, theirs[0].id, now).await.unwrap();

    assert_eq!(h.scheduling.publish_due(org).await.unwrap(), 2);
    assert_eq!(h.scheduling.publish_due(org).await.unwrap(), 0);

    assert_eq!(
        h.scheduling.post(other, theirs[0].id).await.unwrap().status,
        PostStatus::Scheduled
    );
}

#[tokio::test]
async fn published_posts_never_move_back() {
    let h = harness(ScriptedGenerator::new([Ok(items_json(&["final"]))]));
    let org = with_acme_profile(&h).await;
    let post = h.pipeline.generate_and_persist(org, Some(1)).await.unwrap().remove(0);

    h.scheduling.schedule(org, post.id, start_time()).await.unwrap();
    assert_eq!(h.scheduling.publish_due(org).await.unwrap(), 1);

    let err = h
        .scheduling
        .schedule(org, post.id, start_time() + Duration::days(1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::InvalidTransition(t) if t.from == PostStatus::Published
    ));

    assert_eq!(h.scheduling.publish_due(org).await.unwrap(), 0);
    assert_eq!(h.scheduling.sweep().await, SweepOutcome::Published(0));
    let stored = h.scheduling.post(org, post.id).await.unwrap();
    assert_eq!(stored.status, PostStatus::Published);
    assert_eq!(stored.scheduled_at, Some(start_time()));
}

#[tokio::test]
async fn racing_publish_calls_publish_each_post_once() {
    let h = harness(ScriptedGenerator::new([Ok(items_json(&["1", "2", "3", "4"]))]));
    let org = with_acme_profile(&h).await;
    let posts = h.pipeline.generate_and_persist(org, Some(4)).await.unwrap();
    for post in &posts {
        h.scheduling.schedule(org, post.id, start_time()).await.unwrap();
    }

    let (scoped, swept) = tokio::join!(h.scheduling.publish_due(org), h.scheduling.sweep());

    let swept = match swept {
        SweepOutcome::Published(n) => n,
        other => panic!("unexpected sweep outcome {other:?}"),
    };
    assert_eq!(scoped.unwrap() + swept, 4);
}

#[tokio::test]
async fn sweep_failures_are_contained() {
    let h = harness_with(ScriptedGenerator::new([]), Arc::new(BrokenPostRepository));

    assert_eq!(h.scheduling.sweep().await, SweepOutcome::Failed);
    assert_eq!(h.scheduling.sweep().await, SweepOutcome::Failed);
}

#[tokio::test]
async fn overlapping_sweep_ticks_are_skipped() {
    let posts = Arc::new(GatedPostRepository {
        inner: InMemoryPostRepository::new(),
        entered: Notify::new(),
        release: Notify::new(),
    });
    let clock = Arc::new(ManualClock::new(start_time()));
    let engine = Arc::new(SchedulingEngine::new(posts.clone(), clock));

    let first = tokio::spawn({
        let engine = engine.clone();
        async move { engine.sweep().await }
    });
    posts.entered.notified().await;

    assert_eq!(engine.sweep().await, SweepOutcome::Skipped);

    posts.release.notify_one();
    assert_eq!(first.await.unwrap(), SweepOutcome::Published(0));

    // The guard is released once the tick finishes.
    let next = tokio::spawn({
        let engine = engine.clone();
        async move { engine.sweep().await }
    });
    posts.entered.notified().await;
    posts.release.notify_one();
    assert_eq!(next.await.unwrap(), SweepOutcome::Published(0));
}
