use super::*;
use crate::compile::plan::{SurfaceDesc, compile_frame};
use crate::composition::model::{AnimationDocument, AnimationMode, Keyframe, SceneObject};
use crate::composition::shape::ShapeKind;
use crate::foundation::ids::ObjectId;

fn white() -> RenderSettings {
    RenderSettings {
        clear_rgba: Some([255, 255, 255, 255]),
        ..RenderSettings::default()
    }
}

#[test]
fn filled_square_covers_its_center() {
    let mut doc = AnimationDocument::empty("raster", AnimationMode::Timeline);
    doc.objects.push(SceneObject::leaf(
        ObjectId::new("sq"),
        ShapeKind::Square,
        Keyframe {
            color: "#ff0000".into(),
            ..Keyframe::at(0.0, 32.0, 32.0)
        },
    ));
    let plan = compile_frame(&doc, 0.0, SurfaceDesc::new(64, 64));
    let frame = CpuRasterizer::new(white()).render(&plan).unwrap();

    assert_eq!(frame.data.len(), 64 * 64 * 4);
    assert_eq!(frame.pixel(32, 32), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(0, 0), Some([255, 255, 255, 255]));
}

#[test]
fn empty_plan_is_just_the_background() {
    let doc = AnimationDocument::empty("blank", AnimationMode::Timeline);
    let plan = compile_frame(&doc, 0.0, SurfaceDesc::new(8, 8));
    let frame = CpuRasterizer::new(RenderSettings::default())
        .render(&plan)
        .unwrap();
    assert!(frame.data.iter().all(|b| *b == 0));
}

#[test]
fn oversized_surface_is_rejected() {
    let doc = AnimationDocument::empty("huge", AnimationMode::Timeline);
    let plan = compile_frame(&doc, 0.0, SurfaceDesc::new(70_000, 8));
    let err = CpuRasterizer::new(white()).render(&plan).unwrap_err();
    assert!(err.to_string().contains("exceeds u16"));
}

fn label_doc(text: &str, opacity: f64) -> AnimationDocument {
    let mut doc = AnimationDocument::empty("label", AnimationMode::Timeline);
    doc.objects.push(SceneObject::leaf(
        ObjectId::new("t"),
        ShapeKind::Text,
        Keyframe {
            color: "#000000".into(),
            text: text.into(),
            height: Some(30.0),
            opacity,
            ..Keyframe::at(0.0, 50.0, 50.0)
        },
    ));
    doc
}

fn dark_pixels(frame: &FrameRGBA) -> Vec<(u32, u32)> {
    let mut out = Vec::new();
    for y in 0..frame.height {
        for x in 0..frame.width {
            if let Some([r, g, b, _]) = frame.pixel(x, y)
                && r < 128
                && g < 128
                && b < 128
            {
                out.push((x, y));
            }
        }
    }
    out
}

#[test]
fn text_label_puts_ink_around_its_center() {
    let plan = compile_frame(&label_doc("WWW", 1.0), 0.0, SurfaceDesc::new(100, 100));
    assert_eq!(plan.ops.len(), 1);
    let frame = CpuRasterizer::new(white()).render(&plan).unwrap();

    let ink = dark_pixels(&frame);
    assert!(!ink.is_empty(), "label produced no pixels");

    let n = ink.len() as f64;
    let cx = ink.iter().map(|(x, _)| f64::from(*x)).sum::<f64>() / n;
    let cy = ink.iter().map(|(_, y)| f64::from(*y)).sum::<f64>() / n;
    assert!((cx - 50.0).abs() < 12.0, "ink centered at x={cx}");
    assert!((cy - 50.0).abs() < 15.0, "ink centered at y={cy}");
}

#[test]
fn faded_label_is_lighter_than_an_opaque_one() {
    let surface = SurfaceDesc::new(100, 100);
    let opaque = CpuRasterizer::new(white())
        .render(&compile_frame(&label_doc("WWW", 1.0), 0.0, surface))
        .unwrap();
    let faded = CpuRasterizer::new(white())
        .render(&compile_frame(&label_doc("WWW", 0.3), 0.0, surface))
        .unwrap();

    let darkest = |f: &FrameRGBA| f.data.chunks_exact(4).map(|px| px[0]).min().unwrap();
    assert!(darkest(&faded) > darkest(&opaque));
    assert!(darkest(&faded) < 255);
}

#[test]
fn missing_font_file_fails_only_when_text_is_drawn() {
    let settings = RenderSettings {
        font_path: Some("does/not/exist.ttf".into()),
        ..white()
    };

    let shapes = AnimationDocument::empty("blank", AnimationMode::Timeline);
    let plan = compile_frame(&shapes, 0.0, SurfaceDesc::new(8, 8));
    assert!(CpuRasterizer::new(settings.clone()).render(&plan).is_ok());

    let plan = compile_frame(&label_doc("x", 1.0), 0.0, SurfaceDesc::new(32, 32));
    let err = CpuRasterizer::new(settings).render(&plan).unwrap_err();
    assert!(err.to_string().contains("read font"));
}

#[test]
fn zero_height_label_draws_nothing() {
    let mut doc = label_doc("WWW", 1.0);
    doc.objects[0].transitions[0].height = Some(0.0);
    let plan = compile_frame(&doc, 0.0, SurfaceDesc::new(64, 64));
    let frame = CpuRasterizer::new(white()).render(&plan).unwrap();
    assert!(dark_pixels(&frame).is_empty());
}
