//! Tests for the orchestration core against mock collaborators.

mod test_utils;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use storyboard_config::StoryboardConfig;
use storyboard_core::{SequenceId, TaskKey, TaskKind, VideoDuration, Voice};
use storyboard_orchestrator::{Storyboard, Transition};
use test_utils::{MockServices, until};

async fn created(mock: &Arc<MockServices>) -> (Storyboard, SequenceId) {
    let board = mock.storyboard();
    let id = board.create_sequence("a cat's day").await.unwrap();
    (board, id)
}

/// Give scene `index` both a clip and speech.
async fn make_composable(board: &Storyboard, id: SequenceId, index: usize) {
    board
        .animate_scene(id, index, VideoDuration::Five)
        .await
        .unwrap();
    board.synthesize_speech(id, index, None, None).await.unwrap();
}

#[tokio::test]
async fn test_create_sequence_builds_all_scenes() {
    let mock = MockServices::new();
    let (board, id) = created(&mock).await;

    let seq = board.sequence(id).unwrap();
    assert_eq!(seq.scene_count(), 5);
    assert_eq!(seq.base_prompt(), "a cat's day");
    assert!(!seq.narrative().is_empty());
    assert!(seq.composed().is_none());
    for scene in seq.scenes() {
        assert!(scene.image_url().is_some_and(|url| !url.is_empty()));
        assert!(!scene.has_video());
        assert!(!scene.has_audio());
    }

    assert_eq!(board.active(), Some(id));
    assert_eq!(mock.narrative_calls.load(Ordering::SeqCst), 1);
    assert_eq!(mock.image_calls.load(Ordering::SeqCst), 5);
    assert!(!board.tracker().is_creating());
}

#[tokio::test]
async fn test_create_sequence_prepends_newest() {
    let mock = MockServices::new();
    let board = mock.storyboard();
    let first = board.create_sequence("first").await.unwrap();
    let second = board.create_sequence("second").await.unwrap();

    let ids: Vec<_> = board.sequences().iter().map(|s| *s.id()).collect();
    assert_eq!(ids, vec![second, first]);
    assert_eq!(board.active(), Some(second));
}

#[tokio::test]
async fn test_create_sequence_uses_expanded_prompt() {
    let mock = MockServices::new();
    *mock.expanded_prompt.lock() = Some("a richly detailed cat".to_string());
    let (board, id) = created(&mock).await;

    let seq = board.sequence(id).unwrap();
    assert!(
        seq.scenes()
            .iter()
            .all(|s| s.image_prompt() == "a richly detailed cat")
    );
}

#[tokio::test]
async fn test_create_sequence_rejects_empty_prompt() {
    let mock = MockServices::new();
    let board = mock.storyboard();

    let err = board.create_sequence("   ").await.unwrap_err();
    assert!(err.is_validation());
    assert!(board.sequences().is_empty());
    assert_eq!(mock.narrative_calls.load(Ordering::SeqCst), 0);
    assert!(board.notices().list().is_empty());
}

#[tokio::test]
async fn test_create_sequence_is_all_or_nothing() {
    let mock = MockServices::new();
    *mock.fail_image_call.lock() = Some(3);
    let board = mock.storyboard();

    let err = board.create_sequence("a cat's day").await.unwrap_err();
    assert!(err.is_upstream());
    assert!(board.sequences().is_empty());
    assert_eq!(board.active(), None);
    assert!(!board.tracker().is_creating());

    let notices = board.notices().list();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].message().contains("Failed to generate scene images"));
}

#[tokio::test]
async fn test_create_sequence_narrative_failure() {
    let mock = MockServices::new();
    mock.fail_narrative.store(true, Ordering::SeqCst);
    let board = mock.storyboard();

    let err = board.create_sequence("a cat's day").await.unwrap_err();
    assert!(err.is_upstream());
    assert_eq!(mock.image_calls.load(Ordering::SeqCst), 0);
    assert!(!board.tracker().is_creating());
    assert_eq!(board.notices().list().len(), 1);
}

#[tokio::test]
async fn test_second_concurrent_create_rejected() {
    let mock = MockServices::new();
    let board = mock.storyboard();
    mock.narrative_gate.close();

    let (first, second) = tokio::join!(board.create_sequence("first"), async {
        until(|| mock.narrative_gate.waiting() == 1).await;
        assert!(board.snapshot().creating);
        let result = board.create_sequence("second").await;
        mock.narrative_gate.open();
        result
    });

    assert!(first.is_ok());
    assert!(second.unwrap_err().is_already_in_flight());
    assert_eq!(board.sequences().len(), 1);
    assert_eq!(mock.narrative_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_regenerate_image_touches_only_target() {
    let mock = MockServices::new();
    let (board, id) = created(&mock).await;
    let before = board.sequence(id).unwrap();

    let transition = board.regenerate_image(id, 2).await.unwrap();
    assert_eq!(transition, Transition::Applied);

    let after = board.sequence(id).unwrap();
    assert_ne!(after.scenes()[2].image_url(), before.scenes()[2].image_url());
    assert_eq!(after.scenes()[2].image_prompt(), before.scenes()[2].image_prompt());
    assert_eq!(after.scenes()[2].dialogue(), before.scenes()[2].dialogue());
    for index in [0, 1, 3, 4] {
        assert_eq!(after.scenes()[index], before.scenes()[index]);
    }
    assert_eq!(after.narrative(), before.narrative());

    let last = mock.image_requests.lock().last().cloned().unwrap();
    assert_eq!(&last.prompt, before.scenes()[2].image_prompt());
    assert_eq!(last.seed, None);
}

#[tokio::test]
async fn test_regenerate_image_keeps_seed_when_configured() {
    let mock = MockServices::new();
    let board = mock.storyboard_with(|config| config.storyboard.keep_seed_on_regenerate = true);
    let id = board.create_sequence("a cat's day").await.unwrap();
    let seed = board.sequence(id).unwrap().scenes()[1].image_seed();
    assert!(seed.is_some());

    board.regenerate_image(id, 1).await.unwrap();

    let last = mock.image_requests.lock().last().cloned().unwrap();
    assert_eq!(last.seed, seed);
}

#[tokio::test]
async fn test_regenerate_unknown_scene_is_validation_error() {
    let mock = MockServices::new();
    let (board, id) = created(&mock).await;

    let err = board.regenerate_image(id, 9).await.unwrap_err();
    assert!(err.is_validation());
    let err = board.regenerate_image(SequenceId::new(), 0).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(mock.image_calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_animate_and_regenerate_same_scene_both_land() {
    let mock = MockServices::new();
    let (board, id) = created(&mock).await;
    mock.video_gate.close();

    let (animated, regenerated) =
        tokio::join!(board.animate_scene(id, 2, VideoDuration::Ten), async {
            until(|| mock.video_gate.waiting() == 1).await;
            assert!(board.snapshot().is_busy(id, 2, TaskKind::Animate));
            let result = board.regenerate_image(id, 2).await;
            mock.video_gate.open();
            result
        });

    assert_eq!(animated.unwrap(), Transition::Applied);
    assert_eq!(regenerated.unwrap(), Transition::Applied);

    let scene = board.sequence(id).unwrap().scenes()[2].clone();
    assert_eq!(scene.video_duration(), Some(VideoDuration::Ten));
    assert_eq!(scene.image_url(), Some("https://img/6.png"));
    assert!(board.tracker().snapshot().is_empty());
}

#[tokio::test]
async fn test_animate_same_scene_twice_rejected() {
    let mock = MockServices::new();
    let (board, id) = created(&mock).await;
    mock.video_gate.close();

    let (first, second) = tokio::join!(board.animate_scene(id, 0, VideoDuration::Five), async {
        until(|| mock.video_gate.waiting() == 1).await;
        let result = board.animate_scene(id, 0, VideoDuration::Ten).await;
        mock.video_gate.open();
        result
    });

    assert!(first.is_ok());
    assert!(second.unwrap_err().is_already_in_flight());
    assert_eq!(mock.video_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_animate_uses_dialogue_as_motion_prompt() {
    let mock = MockServices::new();
    let (board, id) = created(&mock).await;

    board.animate_scene(id, 1, VideoDuration::Five).await.unwrap();
    let request = mock.video_requests.lock().last().cloned().unwrap();
    assert_eq!(request.prompt, "Line 1");
    assert_eq!(request.duration, VideoDuration::Five);
    assert_eq!(
        Some(request.image_url.as_str()),
        board.sequence(id).unwrap().scenes()[1].image_url()
    );

    board.edit_dialogue(id, 1, "").unwrap();
    board.animate_scene(id, 1, VideoDuration::Five).await.unwrap();
    let request = mock.video_requests.lock().last().cloned().unwrap();
    assert_eq!(&request.prompt, board.sequence(id).unwrap().scenes()[1].image_prompt());
}

#[tokio::test]
async fn test_late_result_after_delete_is_discarded() {
    let mock = MockServices::new();
    let (board, id) = created(&mock).await;
    mock.video_gate.close();

    let (animated, ()) = tokio::join!(board.animate_scene(id, 0, VideoDuration::Five), async {
        until(|| mock.video_gate.waiting() == 1).await;
        board.delete_sequence(id);
        mock.video_gate.open();
    });

    assert_eq!(animated.unwrap(), Transition::Discarded);
    assert!(board.sequences().is_empty());
    assert!(!board
        .tracker()
        .is_active(&TaskKey::new(id, 0, TaskKind::Animate)));
}

#[tokio::test]
async fn test_failure_releases_task_key() {
    let mock = MockServices::new();
    let (board, id) = created(&mock).await;
    mock.fail_video.store(true, Ordering::SeqCst);

    let err = board
        .animate_scene(id, 0, VideoDuration::Five)
        .await
        .unwrap_err();
    assert!(err.is_upstream());
    assert!(!board.tracker().is_scene_busy(id, 0));
    assert!(!board.sequence(id).unwrap().scenes()[0].has_video());
    assert_eq!(board.notices().list().len(), 1);

    mock.fail_video.store(false, Ordering::SeqCst);
    let transition = board.animate_scene(id, 0, VideoDuration::Five).await.unwrap();
    assert_eq!(transition, Transition::Applied);
}

#[tokio::test]
async fn test_failed_regenerate_keeps_prior_image() {
    let mock = MockServices::new();
    let (board, id) = created(&mock).await;
    let before = board.sequence(id).unwrap().scenes()[0].clone();
    *mock.fail_image_call.lock() = Some(6);

    let err = board.regenerate_image(id, 0).await.unwrap_err();
    assert!(err.is_upstream());

    let after = board.sequence(id).unwrap().scenes()[0].clone();
    assert_eq!(after, before);
    assert!(!board
        .tracker()
        .is_active(&TaskKey::new(id, 0, TaskKind::RegenerateImage)));
    let notices = board.notices().list();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].message().contains("Failed to regenerate the image"));
}

#[tokio::test]
async fn test_failed_speech_keeps_prior_audio() {
    let mock = MockServices::new();
    let (board, id) = created(&mock).await;
    board.synthesize_speech(id, 0, None, None).await.unwrap();
    let prior = board.sequence(id).unwrap().scenes()[0].audio_url().clone();
    mock.fail_speech.store(true, Ordering::SeqCst);

    let err = board.synthesize_speech(id, 0, None, None).await.unwrap_err();
    assert!(err.is_upstream());

    assert_eq!(prior.as_deref(), Some("https://aud/1.wav"));
    assert_eq!(board.sequence(id).unwrap().scenes()[0].audio_url(), &prior);
    assert!(!board
        .tracker()
        .is_active(&TaskKey::new(id, 0, TaskKind::SynthesizeSpeech)));
    let notices = board.notices().list();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].message().contains("Failed to generate speech"));
    assert!(notices[0].message().contains("voice offline"));
}

#[tokio::test]
async fn test_failed_compose_leaves_clip_unchanged() {
    let mock = MockServices::new();
    let (board, id) = created(&mock).await;
    make_composable(&board, id, 0).await;
    board.compose(id).await.unwrap();
    let prior = board.sequence(id).unwrap().composed().clone();
    mock.fail_compose.store(true, Ordering::SeqCst);

    let err = board.compose(id).await.unwrap_err();
    assert!(err.is_upstream());

    assert!(prior.is_some());
    assert_eq!(board.sequence(id).unwrap().composed(), &prior);
    assert!(!board
        .tracker()
        .is_active(&TaskKey::new(id, 0, TaskKind::Compose)));
    let notices = board.notices().list();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].message().contains("Failed to compose the clip"));

    mock.fail_compose.store(false, Ordering::SeqCst);
    assert_eq!(board.compose(id).await.unwrap(), Transition::Applied);
}

#[test]
fn test_unknown_default_voice_is_rejected() {
    let mock = MockServices::new();
    let mut config = StoryboardConfig::bundled().unwrap();
    config.storyboard.default_voice = "zz_nobody".into();

    let err = match Storyboard::new(mock.collaborators(), config.storyboard) {
        Ok(_) => panic!("unknown voice accepted"),
        Err(err) => err,
    };
    assert!(err.is_validation());
    assert!(err.user_message().contains("zz_nobody"), "got: {err}");
}

#[tokio::test]
async fn test_speech_uses_default_or_chosen_voice() {
    let mock = MockServices::new();
    let (board, id) = created(&mock).await;

    board.synthesize_speech(id, 0, None, None).await.unwrap();
    let voice = Voice::parse("bm_adam").unwrap();
    board
        .synthesize_speech(id, 1, Some(voice.clone()), None)
        .await
        .unwrap();

    let requests = mock.speech_requests.lock().clone();
    assert_eq!(requests[0].voice, Voice::default());
    assert_eq!(requests[0].text, "Line 0");
    assert_eq!(requests[1].voice, voice);

    let seq = board.sequence(id).unwrap();
    assert!(seq.scenes()[0].has_audio());
    assert!(seq.scenes()[1].has_audio());
    assert!(!seq.scenes()[2].has_audio());
}

#[tokio::test]
async fn test_speech_forwards_progress() {
    let mock = MockServices::new();
    let (board, id) = created(&mock).await;
    let lines = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink_lines = Arc::clone(&lines);

    board
        .synthesize_speech(
            id,
            0,
            None,
            Some(Arc::new(move |line: &str| sink_lines.lock().push(line.to_string()))),
        )
        .await
        .unwrap();

    assert_eq!(*lines.lock(), vec!["synthesizing".to_string()]);
}

#[tokio::test]
async fn test_speech_rejects_empty_dialogue() {
    let mock = MockServices::new();
    mock.silent_outline.store(true, Ordering::SeqCst);
    let (board, id) = created(&mock).await;

    let err = board.synthesize_speech(id, 0, None, None).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(mock.speech_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_edits_never_touch_artifacts() {
    let mock = MockServices::new();
    let (board, id) = created(&mock).await;
    make_composable(&board, id, 0).await;
    let before = board.sequence(id).unwrap().scenes()[0].clone();

    board.edit_dialogue(id, 0, "A new line").unwrap();
    board.edit_image_prompt(id, 0, "a new prompt").unwrap();
    board.edit_narrative(id, "A new story").unwrap();
    board.edit_base_prompt(id, "a dog's day").unwrap();

    let seq = board.sequence(id).unwrap();
    let after = &seq.scenes()[0];
    assert_eq!(after.dialogue(), "A new line");
    assert_eq!(after.image_prompt(), "a new prompt");
    assert_eq!(after.image(), before.image());
    assert_eq!(after.video(), before.video());
    assert_eq!(after.audio_url(), before.audio_url());
    assert_eq!(seq.narrative(), "A new story");
    assert_eq!(seq.base_prompt(), "a dog's day");
}

#[tokio::test]
async fn test_edit_out_of_range_rejected() {
    let mock = MockServices::new();
    let (board, id) = created(&mock).await;

    assert!(board.edit_dialogue(id, 5, "x").unwrap_err().is_validation());
    assert!(
        board
            .edit_narrative(SequenceId::new(), "x")
            .unwrap_err()
            .is_validation()
    );
}

#[tokio::test]
async fn test_compose_without_qualifying_scene() {
    let mock = MockServices::new();
    let (board, id) = created(&mock).await;
    board.animate_scene(id, 0, VideoDuration::Five).await.unwrap();
    board.synthesize_speech(id, 1, None, None).await.unwrap();

    let err = board.compose(id).await.unwrap_err();
    assert!(err.is_validation());
    assert!(board.sequence(id).unwrap().composed().is_none());
    assert_eq!(mock.compose_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_compose_picks_lowest_qualifying_scene() {
    let mock = MockServices::new();
    let (board, id) = created(&mock).await;
    make_composable(&board, id, 3).await;
    make_composable(&board, id, 1).await;

    assert_eq!(board.compose(id).await.unwrap(), Transition::Applied);

    let seq = board.sequence(id).unwrap();
    let clip = seq.composed().clone().unwrap();
    assert_eq!(*clip.source_scene(), 1);
    assert_eq!(*clip.duration(), VideoDuration::Five);

    let request = mock.compose_requests.lock().last().cloned().unwrap();
    assert_eq!(Some(request.video_url.as_str()), seq.scenes()[1].video_url());
    assert_eq!(request.audio_url, seq.scenes()[1].audio_url().clone().unwrap());
}

#[tokio::test]
async fn test_caption_composed_clip() {
    let mock = MockServices::new();
    let (board, id) = created(&mock).await;

    let err = board.caption_composed(id).await.unwrap_err();
    assert!(err.is_validation());

    make_composable(&board, id, 0).await;
    board.compose(id).await.unwrap();
    assert_eq!(board.caption_composed(id).await.unwrap(), Transition::Applied);

    let clip = board.sequence(id).unwrap().composed().clone().unwrap();
    assert_eq!(
        clip.captioned_url().as_deref(),
        Some(format!("{}?captioned", clip.url()).as_str())
    );
}

#[tokio::test]
async fn test_caption_dropped_when_recomposed() {
    let mock = MockServices::new();
    let (board, id) = created(&mock).await;
    make_composable(&board, id, 0).await;
    board.compose(id).await.unwrap();
    mock.caption_gate.close();

    let (captioned, recomposed) = tokio::join!(board.caption_composed(id), async {
        until(|| mock.caption_gate.waiting() == 1).await;
        let result = board.compose(id).await;
        mock.caption_gate.open();
        result
    });

    assert!(captioned.is_ok());
    assert!(recomposed.is_ok());
    let clip = board.sequence(id).unwrap().composed().clone().unwrap();
    assert_eq!(clip.url(), "https://out/2.mp4");
    assert!(clip.captioned_url().is_none());
}

#[tokio::test]
async fn test_caption_failure_surfaces_notice() {
    let mock = MockServices::new();
    let (board, id) = created(&mock).await;
    make_composable(&board, id, 0).await;
    board.compose(id).await.unwrap();
    mock.fail_caption.store(true, Ordering::SeqCst);

    let err = board.caption_composed(id).await.unwrap_err();
    assert!(err.is_upstream());
    let notices = board.notices().list();
    assert!(notices[0].message().contains("timed out after 120s"));
}

#[tokio::test]
async fn test_delete_absent_sequence_is_noop() {
    let mock = MockServices::new();
    let (board, id) = created(&mock).await;

    board.delete_sequence(SequenceId::new());
    assert_eq!(board.sequences().len(), 1);
    assert_eq!(board.active(), Some(id));
}

#[tokio::test]
async fn test_delete_active_moves_selection() {
    let mock = MockServices::new();
    let board = mock.storyboard();
    let oldest = board.create_sequence("one").await.unwrap();
    let middle = board.create_sequence("two").await.unwrap();
    let newest = board.create_sequence("three").await.unwrap();

    board.select_sequence(oldest).unwrap();
    board.delete_sequence(middle);
    assert_eq!(board.active(), Some(oldest));

    board.delete_sequence(oldest);
    assert_eq!(board.active(), Some(newest));

    board.delete_sequence(newest);
    assert_eq!(board.active(), None);
    assert!(board.snapshot().active_sequence().is_none());
}

#[tokio::test]
async fn test_notices_dismiss() {
    let mock = MockServices::new();
    mock.fail_narrative.store(true, Ordering::SeqCst);
    let board = mock.storyboard();
    let _ = board.create_sequence("one").await;
    let _ = board.create_sequence("two").await;

    let notices = board.notices().list();
    assert_eq!(notices.len(), 2);
    board.notices().dismiss(*notices[0].id());
    let remaining = board.notices().list();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id(), notices[1].id());
}
