use super::*;

#[test]
fn indexed_buffer_targets_are_spread_by_index() {
    let ubo0 = buffer_bindpoint(GL_UNIFORM_BUFFER, 0).unwrap();
    let ubo3 = buffer_bindpoint(GL_UNIFORM_BUFFER, 3).unwrap();
    assert_eq!(ubo3 - ubo0, 3 * BUFFER_KINDS);
    assert!(is_buffer_kind(ubo3, buffer_kind::UNIFORM));
    assert!(!is_buffer_kind(ubo3, buffer_kind::SHADER_STORAGE));

    // Non-indexed targets ignore the index.
    assert_eq!(
        buffer_bindpoint(GL_ARRAY_BUFFER, 5),
        Some(buffer_kind::ARRAY)
    );
    assert_eq!(buffer_bindpoint(0x1234, 0), None);
}

#[test]
fn cube_faces_share_the_cube_bindpoint() {
    let cube = texture_bindpoint(GL_TEXTURE_CUBE_MAP, 2);
    assert_eq!(texture_bindpoint(GL_TEXTURE_CUBE_MAP_POSITIVE_X, 2), cube);
    assert_eq!(texture_bindpoint(GL_TEXTURE_CUBE_MAP_NEGATIVE_Z, 2), cube);
    assert_ne!(texture_bindpoint(GL_TEXTURE_2D, 2), cube);
    assert_eq!(texture_bindpoint(0xdead, 0), None);
}

#[test]
fn texture_units_do_not_overlap() {
    let unit0: Vec<_> = texture_unit_bindpoints(0).collect();
    let unit1: Vec<_> = texture_unit_bindpoints(1).collect();
    assert_eq!(unit0.len() as u32, TEXTURE_KINDS);
    assert!(unit0.iter().all(|bp| !unit1.contains(bp)));
    assert!(unit1.contains(&texture_bindpoint(GL_TEXTURE_2D, 1).unwrap()));
}

#[test]
fn query_and_framebuffer_targets() {
    assert_ne!(
        query_bindpoint(GL_SAMPLES_PASSED, 0),
        query_bindpoint(GL_SAMPLES_PASSED, 1)
    );
    assert_eq!(query_bindpoint(0, 0), None);

    assert_eq!(
        framebuffer_bindpoints(GL_FRAMEBUFFER),
        &[GL_DRAW_FRAMEBUFFER, GL_READ_FRAMEBUFFER]
    );
    assert_eq!(framebuffer_bindpoint(GL_FRAMEBUFFER), Some(GL_DRAW_FRAMEBUFFER));
    assert_eq!(framebuffer_bindpoint(GL_READ_FRAMEBUFFER), Some(GL_READ_FRAMEBUFFER));
    assert!(framebuffer_bindpoints(0).is_empty());
}

#[test]
fn indices_past_the_bindpoint_range_have_no_bindpoint() {
    assert_eq!(buffer_bindpoint(GL_UNIFORM_BUFFER, 0x1000_0000), None);
    assert_eq!(buffer_bindpoint(GL_SHADER_STORAGE_BUFFER, u32::MAX), None);
    // Non-indexed targets never look at the index.
    assert_eq!(buffer_bindpoint(GL_ARRAY_BUFFER, u32::MAX), Some(buffer_kind::ARRAY));

    assert_eq!(texture_bindpoint(GL_TEXTURE_2D, 0x2000_0000), None);
    assert_eq!(texture_unit_bindpoints(0x2000_0000).count(), 0);
    assert_eq!(texture_unit_bindpoints(u32::MAX).count(), 0);
    assert_eq!(query_bindpoint(GL_TIMESTAMP, u32::MAX), None);
}
