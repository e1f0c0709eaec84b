use super::*;
use crate::foundation::core::Fps;

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 2,
        height: 1,
        fps: Fps { num: 60, den: 1 },
        audio: None,
    }
}

fn frame(v: u8) -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 1,
        data: vec![v, v, v, 255, v, v, v, 255],
        premultiplied: true,
    }
}

#[test]
fn in_memory_sink_keeps_frames_in_order() {
    let mut sink = InMemorySink::new();
    assert!(sink.push_frame(FrameIndex(0), &frame(1)).is_err());
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame(1)).unwrap();
    sink.push_frame(FrameIndex(1), &frame(2)).unwrap();
    sink.end().unwrap();
    assert!(sink.is_ended());
    assert_eq!(sink.config().unwrap().width, 2);
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1]);
    assert_eq!(sink.frames()[1].1, frame(2));
}

#[test]
fn png_sequence_writes_numbered_files() {
    let dir = std::env::temp_dir().join(format!(
        "disco_doodle_pngseq_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let mut sink = PngSequenceSink::new(&dir);
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame(10)).unwrap();
    sink.push_frame(FrameIndex(1), &frame(20)).unwrap();
    assert!(sink.push_frame(FrameIndex(1), &frame(30)).is_err());
    sink.end().unwrap();
    assert_eq!(sink.written(), 2);
    assert!(dir.join("frame_00000.png").exists());
    let img = image::open(dir.join("frame_00001.png")).unwrap().to_rgba8();
    assert_eq!(img.get_pixel(1, 0).0, [20, 20, 20, 255]);
    let _ = std::fs::remove_dir_all(dir);
}
