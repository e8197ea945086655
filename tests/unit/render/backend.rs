use super::*;

#[test]
fn straight_conversion_undoes_premultiplication() {
    let frame = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![128, 0, 0, 128, 0, 0, 0, 0],
        premultiplied: true,
    };
    let straight = frame.to_straight_rgba8();
    assert_eq!(&straight[..4], &[255, 0, 0, 128]);
    assert_eq!(&straight[4..], &[0, 0, 0, 0]);
    assert_eq!(frame.pixel(0, 0), Some([255, 0, 0, 128]));
    assert_eq!(frame.pixel(2, 0), None);
}
