use super::*;

#[test]
fn premul_then_unpremul_keeps_opaque_pixels() {
    let mut px = vec![10u8, 200, 37, 255, 0, 0, 0, 255];
    let orig = px.clone();
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, orig);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, orig);
}

#[test]
fn transparent_pixels_zero_their_color() {
    let mut px = vec![90u8, 80, 70, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, [0, 0, 0, 0]);
}

#[test]
fn half_alpha_premul_matches_rounding() {
    let mut px = vec![100u8, 50, 200, 128];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(
        px,
        [
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
}
