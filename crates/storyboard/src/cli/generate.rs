//! Generate command handler.

use crate::cli::GenerateArgs;
use futures::future::join_all;
use std::sync::Arc;
use storyboard::{
    JsonError, ProgressSink, Sequence, SequenceId, Storyboard, StoryboardConfig, StoryboardResult,
    VideoDuration, Voice, http_collaborators,
};
use tracing::{debug, info, warn};

/// Run the whole pipeline for one prompt and print the finished sequence.
///
/// Per-scene failures are reported as warnings and do not abort the run;
/// configuration, validation and creation failures do.
///
/// # Errors
///
/// Returns an error if configuration is invalid, an API key is missing,
/// an option is out of range, or the sequence cannot be created.
#[tracing::instrument(skip(args), fields(prompt = %args.prompt))]
pub async fn run_generate(args: GenerateArgs) -> StoryboardResult<()> {
    let config = match &args.config {
        Some(path) => StoryboardConfig::from_file(path)?,
        None => StoryboardConfig::load()?,
    };
    config.validate()?;

    let duration = args.animate.map(VideoDuration::try_from).transpose()?;
    let voice = args.voice.as_deref().map(Voice::parse).transpose()?;

    let board = Storyboard::new(http_collaborators(&config)?, config.storyboard.clone())?;

    info!("Generating narrative and scene images");
    let id = board.create_sequence(&args.prompt).await?;
    let scene_count = config.storyboard.scene_count;

    if let Some(duration) = duration {
        info!(%duration, "Animating scenes");
        let results =
            join_all((0..scene_count).map(|i| board.animate_scene(id, i, duration))).await;
        report("animate", &results);
    }

    if args.speech {
        info!("Synthesizing speech");
        let results = join_all((0..scene_count).map(|i| {
            let progress: ProgressSink =
                Arc::new(move |line: &str| debug!(scene = i, "{}", line));
            board.synthesize_speech(id, i, voice.clone(), Some(progress))
        }))
        .await;
        report("synthesize speech for", &results);
    }

    if args.compose || args.caption {
        info!("Composing clip");
        board.compose(id).await?;
    }

    if args.caption {
        info!("Captioning composed clip");
        board.caption_composed(id).await?;
    }

    let Some(sequence) = board.sequence(id) else {
        warn!(sequence_id = %id, "Sequence vanished before printing");
        return Ok(());
    };
    if args.json {
        let rendered = serde_json::to_string_pretty(&sequence)
            .map_err(|e| JsonError::new(e.to_string()))?;
        println!("{}", rendered);
    } else {
        print_sequence(id, &sequence);
    }
    Ok(())
}

fn report<T>(action: &str, results: &[StoryboardResult<T>]) {
    for (index, result) in results.iter().enumerate() {
        if let Err(e) = result {
            warn!(scene = index, "Could not {} scene: {}", action, e.user_message());
        }
    }
}

fn print_sequence(id: SequenceId, sequence: &Sequence) {
    println!("Sequence {}", id);
    println!("Prompt: {}", sequence.base_prompt());
    println!();
    println!("{}", sequence.narrative());

    for (index, scene) in sequence.scenes().iter().enumerate() {
        println!();
        println!("Scene {} [{}]", index + 1, scene.state());
        println!("  Dialogue: {}", scene.dialogue());
        println!("  Prompt:   {}", scene.image_prompt());
        if let Some(url) = scene.image_url() {
            println!("  Image:    {}", url);
        }
        if let Some(url) = scene.video_url() {
            println!("  Video:    {}", url);
        }
        if let Some(url) = scene.audio_url() {
            println!("  Audio:    {}", url);
        }
    }

    if let Some(clip) = sequence.composed() {
        println!();
        println!("Composed (scene {}): {}", clip.source_scene() + 1, clip.url());
        if let Some(url) = clip.captioned_url() {
            println!("Captioned: {}", url);
        }
    }
}
