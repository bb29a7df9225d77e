/*!
 * Tests for line segmentation
 */

use autocaps::segmenter::{segment, SegmentOptions};
use crate::common::{fox_tokens, monotone_tokens, tok};

/// The four-word sample stays a single line: 17 chars and 1.1s of speech
/// are both under the thresholds.
#[test]
fn test_segment_withFoxTokens_shouldProduceSingleLine() {
    let lines = segment(&fox_tokens(), SegmentOptions::default());

    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].text, "a quick brown fox");
    assert_eq!(lines[0].start, 0.0);
    assert_eq!(lines[0].end, 1.3);
    assert_eq!(lines[0].words.len(), 4);
}

/// A fifth token after 1.7s of silence (> 1.5 max gap) starts a new line.
#[test]
fn test_segment_withSilenceGap_shouldSplitAtGap() {
    let mut tokens = fox_tokens();
    tokens.push(tok("jumps", 3.0, 3.4));

    let lines = segment(&tokens, SegmentOptions::default());

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].text, "a quick brown fox");
    assert_eq!(lines[1].text, "jumps");
    assert_eq!(lines[1].start, 3.0);
    assert_eq!(lines[1].end, 3.4);
}

/// The word that trips the character threshold stays in the flushed line.
#[test]
fn test_segment_withCharOverflow_shouldKeepTriggeringWordInFlushedLine() {
    let tokens = vec![
        tok("twelve_chars", 0.0, 0.1),
        tok("eleven_char", 0.15, 0.25),
        tok("next", 0.3, 0.4),
    ];

    let lines = segment(&tokens, SegmentOptions::default());

    // "twelve_chars eleven_char" is 24 chars > 20, flushed together
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].text, "twelve_chars eleven_char");
    assert_eq!(lines[1].text, "next");
}

/// Duration counts the words' own spans, not the wall-clock span of the
/// line: silence inside a line does not count against max_duration.
#[test]
fn test_segment_withInternalSilence_shouldSumWordDurationsOnly() {
    let opts = SegmentOptions {
        max_chars: 20,
        max_duration: 1.3,
        max_gap: 5.0,
    };
    // Wall clock span is 4.1s but spoken duration is only 0.2s
    let tokens = vec![tok("a", 0.0, 0.1), tok("b", 4.0, 4.1)];

    let lines = segment(&tokens, opts);

    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].text, "a b");
}

/// Every produced line respects the duration bound unless it is a
/// single word that alone exceeds it.
#[test]
fn test_segment_withLongStream_shouldBoundLineDurations() {
    let opts = SegmentOptions::default();
    let lines = segment(&monotone_tokens(100), opts);

    assert!(!lines.is_empty());
    for line in &lines {
        let spoken: f64 = line.words.iter().map(|w| w.end - w.start).sum();
        assert!(
            spoken <= opts.max_duration || line.words.len() == 1,
            "line '{}' has spoken duration {}",
            line.text,
            spoken
        );
    }
}

/// Concatenating all lines' words reproduces the input stream exactly.
#[test]
fn test_segment_withLongStream_shouldCoverAllTokens() {
    let tokens = monotone_tokens(250);
    let lines = segment(&tokens, SegmentOptions::default());

    let rejoined: Vec<_> = lines.iter().flat_map(|l| l.words.iter().cloned()).collect();
    assert_eq!(rejoined, tokens);
}

/// Line invariants: start/end mirror the first/last word.
#[test]
fn test_segment_withLongStream_shouldKeepLineSpanInvariants() {
    let lines = segment(&monotone_tokens(40), SegmentOptions::default());

    for line in &lines {
        assert_eq!(line.start, line.words.first().unwrap().start);
        assert_eq!(line.end, line.words.last().unwrap().end);
    }
}

/// The gap check never fires for the first token, whatever its start.
#[test]
fn test_segment_withLateFirstToken_shouldNotSplitAtStreamStart() {
    let tokens = vec![tok("late", 100.0, 100.2), tok("word", 100.3, 100.5)];
    let lines = segment(&tokens, SegmentOptions::default());

    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].text, "late word");
}

/// When the gap fires, the boundary falls exactly between i-1 and i.
#[test]
fn test_segment_withGapMidStream_shouldBreakExactlyAtGap() {
    let tokens = vec![
        tok("one", 0.0, 0.1),
        tok("two", 0.2, 0.3),
        tok("far", 2.0, 2.1),
        tok("away", 2.2, 2.3),
    ];
    let lines = segment(&tokens, SegmentOptions::default());

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].text, "one two");
    assert_eq!(lines[1].text, "far away");
}
