use super::*;

fn scratch_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("scrollreel-png-{tag}-{}", std::process::id()))
}

fn frame() -> FrameRGBA {
    FrameRGBA {
        width: 4,
        height: 2,
        data: [40u8, 80, 120, 255].repeat(8),
        premultiplied: true,
    }
}

#[test]
fn write_png_roundtrips_pixels() {
    let dir = scratch_dir("single");
    let path = dir.join("nested/out.png");
    write_png(&frame(), &path, Rgba8::rgb(0, 0, 0)).unwrap();

    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (4, 2));
    assert_eq!(img.get_pixel(3, 1).0, [40, 80, 120, 255]);
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn sequence_numbers_frames_and_closes() {
    let dir = scratch_dir("seq");
    let mut seq = PngSequence::new(&dir, Rgba8::rgb(0, 0, 0)).unwrap();
    seq.push(&frame()).unwrap();
    seq.push(&frame()).unwrap();
    seq.finish().unwrap();

    assert_eq!(seq.frames_written(), 2);
    assert!(dir.join("frame_00000.png").exists());
    assert!(dir.join("frame_00001.png").exists());
    assert!(seq.push(&frame()).is_err());
    let _ = std::fs::remove_dir_all(dir);
}
