/*!
 * End-to-end caption pipeline tests
 */

use anyhow::Result;
use autocaps::app_config::Config;
use autocaps::app_controller::{Controller, LayoutDocument};
use autocaps::caption_layout::{ElementKind, FrameGeometry};
use autocaps::word_timing;
use crate::common::{self, tok};

#[test]
fn test_build_layout_document_withFoxTokens_shouldLayoutEveryLine() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let tokens = common::fox_tokens();

    let document = controller.build_layout_document(&tokens, FrameGeometry::new(1080.0, 1920.0))?;

    assert_eq!(document.lines.len(), 1);
    assert_eq!(document.lines[0].line.text, "a quick brown fox");
    assert_eq!(document.lines[0].elements.len(), 16);
    Ok(())
}

#[test]
fn test_prepare_tokens_withOverlappingStream_shouldFail() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let tokens = vec![tok("one", 0.0, 1.0), tok("two", 0.5, 1.5)];

    assert!(controller.prepare_tokens(tokens).is_err());
    Ok(())
}

#[test]
fn test_prepare_tokens_withContraction_shouldMergeBeforeValidation() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let tokens = vec![tok("qu", 0.0, 0.2), tok("'est", 0.2, 0.5)];

    let prepared = controller.prepare_tokens(tokens)?;
    assert_eq!(prepared.len(), 1);
    assert_eq!(prepared[0].text, "qu'est");
    Ok(())
}

#[tokio::test]
async fn test_run_withWordsAndFrameOverride_shouldWriteOutputs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    // A placeholder video file; the frame override keeps ffprobe out of the run
    let video_path = common::create_test_file(&dir, "clip.mp4", "not a real video")?;

    let mut tokens = common::fox_tokens();
    tokens.push(tok("jumps", 3.0, 3.4));
    let words_path = dir.join("clip.words.json");
    word_timing::store_word_info(&tokens, &words_path)?;

    let mut config = Config::default();
    config.output_dir = dir.join("out").to_string_lossy().to_string();
    let controller = Controller::with_config(config)?;

    let outcome = controller
        .run(
            video_path.clone(),
            None,
            Some(FrameGeometry::new(1080.0, 1920.0)),
            false,
        )
        .await?;

    assert!(!outcome.skipped);
    assert_eq!(outcome.line_count, 2);
    assert!(outcome.layout_path.exists());
    assert!(outcome.srt_path.exists());

    // The layout document parses back and holds the expected elements
    let document: LayoutDocument =
        serde_json::from_str(&std::fs::read_to_string(&outcome.layout_path)?)?;
    assert_eq!(document.lines.len(), 2);
    let total_elements: usize = document.lines.iter().map(|l| l.elements.len()).sum();
    assert_eq!(total_elements, outcome.element_count);
    assert_eq!(total_elements, 4 * 5);

    let highlight_count = document
        .lines
        .iter()
        .flat_map(|l| l.elements.iter())
        .filter(|e| e.kind == ElementKind::Highlight)
        .count();
    assert_eq!(highlight_count, 5);

    // The SRT carries both segmented lines
    let srt = std::fs::read_to_string(&outcome.srt_path)?;
    assert!(srt.contains("a quick brown fox"));
    assert!(srt.contains("jumps"));
    assert!(srt.contains("00:00:00,000 --> 00:00:01,300"));
    assert!(srt.contains("00:00:03,000 --> 00:00:03,400"));

    // A second run without force skips instead of overwriting
    let second = controller
        .run(
            video_path,
            None,
            Some(FrameGeometry::new(1080.0, 1920.0)),
            false,
        )
        .await?;
    assert!(second.skipped);

    Ok(())
}

#[tokio::test]
async fn test_run_withMissingWordsFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let video_path = common::create_test_file(&dir, "clip.mp4", "not a real video")?;

    let mut config = Config::default();
    config.output_dir = dir.join("out").to_string_lossy().to_string();
    let controller = Controller::with_config(config)?;

    let result = controller
        .run(video_path, None, Some(FrameGeometry::new(1080.0, 1920.0)), false)
        .await;
    assert!(result.is_err());
    Ok(())
}

#[tokio::test]
async fn test_run_withMissingInput_shouldFail() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let result = controller
        .run(
            std::path::PathBuf::from("/nonexistent/clip.mp4"),
            None,
            Some(FrameGeometry::new(1080.0, 1920.0)),
            false,
        )
        .await;
    assert!(result.is_err());
    Ok(())
}
