use image::RgbImage;
use wildtrack_rs::tracker::Rect;
use wildtrack_rs::{
    AnimalDetector, DetectionPipeline, DetectorOutput, PipelineConfig, RawDetection, Result,
    SpeciesClassifier, TrackingSession,
};

/// Detector that replays one scripted box list per frame.
struct ScriptedDetector {
    class_names: Vec<String>,
    frames: Vec<Vec<RawDetection>>,
    cursor: usize,
}

impl ScriptedDetector {
    fn new(frames: Vec<Vec<RawDetection>>) -> Self {
        Self {
            class_names: vec![
                "animal".to_owned(),
                "person".to_owned(),
                "vehicle".to_owned(),
            ],
            frames,
            cursor: 0,
        }
    }
}

impl AnimalDetector for ScriptedDetector {
    fn class_names(&self) -> &[String] {
        &self.class_names
    }

    fn detect(&mut self, _image: &RgbImage, _threshold: f32) -> Result<DetectorOutput> {
        let detections = self.frames.get(self.cursor).cloned().unwrap_or_default();
        self.cursor += 1;
        let labels = detections
            .iter()
            .map(|d| self.class_names[d.class_id].clone())
            .collect();
        Ok(DetectorOutput { detections, labels })
    }
}

/// Classifier that always votes "bear" (index 21) with a fixed score.
struct BearClassifier {
    score: f32,
}

impl SpeciesClassifier for BearClassifier {
    fn classify(&mut self, _crop: &RgbImage) -> Result<Vec<f32>> {
        let mut scores = vec![0.01; 26];
        scores[21] = self.score;
        Ok(scores)
    }
}

fn animal_box(x1: f32, y1: f32) -> RawDetection {
    RawDetection {
        bbox: Rect::new(x1, y1, x1 + 60.0, y1 + 40.0),
        class_id: 0,
        confidence: 0.85,
    }
}

fn frame() -> RgbImage {
    RgbImage::new(640, 480)
}

#[test]
fn test_end_to_end_bear_sequence() {
    // Five frames of one box translating by (1, 1) px per frame.
    let frames: Vec<Vec<RawDetection>> = (0..5)
        .map(|i| vec![animal_box(200.0 + i as f32, 200.0 + i as f32)])
        .collect();

    let pipeline = DetectionPipeline::new(
        ScriptedDetector::new(frames),
        BearClassifier { score: 0.9 },
        PipelineConfig::default(),
    )
    .unwrap();
    let mut session = TrackingSession::with_default_tracker(pipeline);

    let mut last = None;
    for i in 0..5 {
        let outputs = session.process_frame(&frame()).unwrap();
        assert_eq!(outputs.len(), 1, "frame {i}");

        let output = &outputs[0];
        assert_eq!(output.id, 0, "one stable track id across all frames");
        assert_eq!(output.label, "bear");
        assert!((output.confidence - 0.9).abs() < 0.05);

        // The smoothed box follows the translation, lagging slightly.
        let expected_x1 = 200 + i;
        assert!((output.bbox[0] - expected_x1).abs() <= 2, "frame {i}");
        last = Some(output.clone());
    }

    let last = last.unwrap();
    assert!(last.bbox[0] >= 202 && last.bbox[0] <= 204);
}

#[test]
fn test_non_animal_frames_yield_no_tracks() {
    // A person and a vehicle, no animal: the gate strips everything.
    let frames = vec![vec![
        RawDetection {
            bbox: Rect::new(100.0, 100.0, 200.0, 300.0),
            class_id: 1,
            confidence: 0.95,
        },
        RawDetection {
            bbox: Rect::new(400.0, 200.0, 600.0, 300.0),
            class_id: 2,
            confidence: 0.9,
        },
    ]];

    let pipeline = DetectionPipeline::new(
        ScriptedDetector::new(frames),
        BearClassifier { score: 0.9 },
        PipelineConfig::default(),
    )
    .unwrap();
    let mut session = TrackingSession::with_default_tracker(pipeline);

    assert!(session.process_frame(&frame()).unwrap().is_empty());
    assert!(session.tracker().is_empty());
}

#[test]
fn test_classification_threshold_monotonicity() {
    // The maximal threshold retains no more boxes than the minimal one.
    let mut retained = Vec::new();
    for threshold in [0.0, 1.0] {
        let config = PipelineConfig {
            classification_threshold: threshold,
            ..PipelineConfig::default()
        };
        let pipeline = DetectionPipeline::new(
            ScriptedDetector::new(vec![vec![animal_box(200.0, 200.0)]]),
            BearClassifier { score: 0.9 },
            config,
        )
        .unwrap();
        let mut session = TrackingSession::with_default_tracker(pipeline);
        retained.push(session.process_frame(&frame()).unwrap().len());
    }
    assert!(retained[1] <= retained[0]);
    assert_eq!(retained[0], 1);
    assert_eq!(retained[1], 0);
}

#[test]
fn test_low_confidence_crops_are_dropped_silently() {
    let pipeline = DetectionPipeline::new(
        ScriptedDetector::new(vec![vec![animal_box(200.0, 200.0)]]),
        BearClassifier { score: 0.3 },
        PipelineConfig::default(),
    )
    .unwrap();
    let mut session = TrackingSession::with_default_tracker(pipeline);

    // Below the 0.5 default classification threshold: informational drop,
    // not an error.
    assert!(session.process_frame(&frame()).unwrap().is_empty());
}
