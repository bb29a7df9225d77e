use anyhow::{Result, Context};
use log::{warn, info, debug};
use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use indicatif::{ProgressBar, ProgressStyle};
use crate::app_config::{CaptionStyle, Config};
use crate::caption_layout::{self, Anchor, FrameGeometry, Platform, PlacedElement};
use crate::file_utils::FileManager;
use crate::media_probe;
use crate::segmenter::{self, SubtitleLine};
use crate::text_metrics::{CachedMeasurer, HeuristicMeasurer, TextMeasurer};
use crate::word_timing::{self, WordToken};

// @module: Application controller for caption generation

/// Layout of one subtitle line: the line plus its placed elements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineLayout {
    pub line: SubtitleLine,
    pub elements: Vec<PlacedElement>,
}

/// Complete layout document handed to the external compositor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub platform: Platform,
    pub anchor: Anchor,
    pub frame: FrameGeometry,
    pub style: CaptionStyle,
    pub lines: Vec<LineLayout>,
}

/// Summary of a completed pipeline run
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub skipped: bool,
    pub line_count: usize,
    pub element_count: usize,
    pub layout_path: PathBuf,
    pub srt_path: PathBuf,
}

/// Main application controller for caption generation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Prepare the token stream the way the pipeline consumes it:
    /// apostrophe fragments merged, preconditions checked.
    pub fn prepare_tokens(&self, tokens: Vec<WordToken>) -> Result<Vec<WordToken>> {
        let merged = word_timing::merge_apostrophe_fragments(tokens);
        word_timing::validate_tokens(&merged)?;
        Ok(merged)
    }

    /// Segment tokens and lay every line out on the frame.
    ///
    /// Pure in-memory pipeline core, usable without any media tooling.
    pub fn build_layout_document(
        &self,
        tokens: &[WordToken],
        frame: FrameGeometry,
    ) -> Result<LayoutDocument> {
        let lines = segmenter::segment(tokens, self.config.segmenter);

        // One measurement cache for the whole run
        let measurer = CachedMeasurer::new(HeuristicMeasurer);
        self.layout_lines(lines, frame, &measurer, None)
    }

    fn layout_lines<M: TextMeasurer>(
        &self,
        lines: Vec<SubtitleLine>,
        frame: FrameGeometry,
        measurer: &M,
        progress: Option<&ProgressBar>,
    ) -> Result<LayoutDocument> {
        let mut laid_out = Vec::with_capacity(lines.len());

        for line in lines {
            let elements = caption_layout::layout(
                &line,
                frame,
                self.config.platform,
                self.config.anchor,
                &self.config.style,
                measurer,
            )?;

            debug!("Laid out line '{}' into {} elements", line.text, elements.len());
            laid_out.push(LineLayout { line, elements });

            if let Some(bar) = progress {
                bar.inc(1);
            }
        }

        Ok(LayoutDocument {
            platform: self.config.platform,
            anchor: self.config.anchor,
            frame,
            style: self.config.style.clone(),
            lines: laid_out,
        })
    }

    /// Run the main workflow with an input video file and output directory
    pub async fn run(
        &self,
        input_file: PathBuf,
        words_file: Option<PathBuf>,
        frame_size: Option<FrameGeometry>,
        force_overwrite: bool,
    ) -> Result<RunOutcome> {
        let start_time = std::time::Instant::now();

        if !input_file.exists() {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_dir = PathBuf::from(&self.config.output_dir);
        FileManager::ensure_dir(&output_dir)?;

        let srt_path = output_dir.join(format!(
            "{}.srt",
            input_file.file_stem().unwrap_or_default().to_string_lossy()
        ));
        if srt_path.exists() && !force_overwrite {
            warn!("Skipping file, captions already exist (use -f to force overwrite)");
            return Ok(RunOutcome { skipped: true, srt_path, ..RunOutcome::default() });
        }

        // Frame geometry: explicit override wins, otherwise probe the video
        let frame = match frame_size {
            Some(frame) => frame,
            None => media_probe::probe_frame_geometry(&input_file).await?,
        };
        info!(
            "Frame {}x{} on {} anchored {}",
            frame.width, frame.height, self.config.platform, self.config.anchor
        );

        // The transcriber's word-level output defaults to a sibling of the video
        let words_path = words_file.unwrap_or_else(|| input_file.with_extension("words.json"));
        if !words_path.exists() {
            return Err(anyhow::anyhow!(
                "Word timing file not found: {:?}. Run a word-level transcriber first \
                 (autocaps extract-audio produces its input).",
                words_path
            ));
        }

        let tokens = self.prepare_tokens(word_timing::read_word_info(&words_path)?)?;
        info!("Loaded {} word tokens from {:?}", tokens.len(), words_path);

        let lines = segmenter::segment(&tokens, self.config.segmenter);
        info!("Segmented into {} subtitle lines", lines.len());

        // Lay every line out, with a progress bar over lines
        let progress_bar = ProgressBar::new(lines.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} lines ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{bar:40}] {pos}/{len} ({percent}%)"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result);

        let measurer = CachedMeasurer::new(HeuristicMeasurer);
        let document = self.layout_lines(lines, frame, &measurer, Some(&progress_bar))?;
        progress_bar.finish_and_clear();

        // Write the compositor document and the plain SRT of the lines
        let layout_path =
            FileManager::timestamped_output_path(&input_file, &output_dir, "captions", "json");
        let json = serde_json::to_string_pretty(&document)
            .context("Failed to serialize layout document")?;
        FileManager::write_to_file(&layout_path, &json)?;

        segmenter::write_srt(
            &document.lines.iter().map(|l| l.line.clone()).collect::<Vec<_>>(),
            &srt_path,
        )?;

        let element_count: usize = document.lines.iter().map(|l| l.elements.len()).sum();
        info!(
            "Caption layout complete in {:.1}s: {} lines, {} elements -> {:?}",
            start_time.elapsed().as_secs_f64(),
            document.lines.len(),
            element_count,
            layout_path
        );

        Ok(RunOutcome {
            skipped: false,
            line_count: document.lines.len(),
            element_count,
            layout_path,
            srt_path,
        })
    }

    /// Run the workflow over every mp4 in a directory
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow::anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let videos = FileManager::find_files(&input_dir, "mp4")?;
        if videos.is_empty() {
            warn!("No mp4 files found in {:?}", input_dir);
            return Ok(());
        }

        info!("Processing {} video files in {:?}", videos.len(), input_dir);
        let mut failures = 0;
        for video in videos {
            if let Err(e) = self.run(video.clone(), None, None, force_overwrite).await {
                warn!("Failed to process {:?}: {}", video, e);
                failures += 1;
            }
        }

        if failures > 0 {
            return Err(anyhow::anyhow!("{} file(s) failed to process", failures));
        }
        Ok(())
    }

    /// Extract the audio track for the external transcriber
    pub async fn run_extract_audio(&self, input_file: PathBuf) -> Result<PathBuf> {
        let audio_path = media_probe::extract_audio(&input_file).await?;
        info!("Extracted audio to {:?}", audio_path);
        Ok(audio_path)
    }
}

/// Lay out already-segmented lines on a frame with explicit settings.
///
/// Boundary entry point for callers that hold raw platform/anchor strings;
/// unrecognized values surface as InvalidPlatform/InvalidAnchor here,
/// before any measurement work.
pub fn layout_lines_for(
    lines: &[SubtitleLine],
    frame: FrameGeometry,
    platform: &str,
    anchor: &str,
    style: &CaptionStyle,
    measurer: &dyn TextMeasurer,
) -> Result<Vec<Vec<PlacedElement>>, crate::errors::LayoutError> {
    let platform: Platform = platform.parse()?;
    let anchor: Anchor = anchor.parse()?;

    lines
        .iter()
        .map(|line| caption_layout::layout(line, frame, platform, anchor, style, measurer))
        .collect()
}
