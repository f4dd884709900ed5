use super::*;

fn lookup(t: &PrefixTable<GlAction>, name: &str) -> Option<GlAction> {
    t.lookup(name).map(|(_, a)| a)
}

#[test]
fn state_calls_follow_the_keep_all_switch() {
    let t = build_call_table(false);
    assert_eq!(
        lookup(&t, "glStencilFunc"),
        Some(GlAction::State { selectors: 1 })
    );
    assert_eq!(
        lookup(&t, "glMaterialfv"),
        Some(GlAction::State { selectors: 2 })
    );
    // Listed in two groups; the first one wins.
    assert_eq!(
        lookup(&t, "glMultiTexCoord2f"),
        Some(GlAction::State { selectors: 0 })
    );

    let keep = build_call_table(true);
    assert_eq!(lookup(&keep, "glStencilFunc"), Some(GlAction::Required));
    assert_eq!(lookup(&keep, "glBlendFunc"), Some(GlAction::Required));
}

#[test]
fn longest_prefix_picks_the_specific_entry_point() {
    let t = build_call_table(false);
    assert_eq!(lookup(&t, "glClearColor"), Some(GlAction::State { selectors: 0 }));
    assert_eq!(
        lookup(&t, "glClear"),
        Some(GlAction::CallOnBoundTo {
            reg: Reg::Framebuffers,
            bindpoint: GL_DRAW_FRAMEBUFFER
        })
    );
    assert_eq!(lookup(&t, "glEndList"), Some(GlAction::EndList));
    assert_eq!(lookup(&t, "glEnd"), Some(GlAction::Immediate));
    assert_eq!(
        lookup(&t, "glUniformMatrix4fv"),
        Some(GlAction::CallOnBound(Reg::Programs))
    );
    assert_eq!(lookup(&t, "glBindBufferBase"), Some(GlAction::BindBufferIndexed));
    assert_eq!(lookup(&t, "glXGetFBConfigAttrib"), Some(GlAction::Required));
}

#[test]
fn repeated_registration_keeps_the_first_handler() {
    let t = build_call_table(false);
    assert_eq!(
        lookup(&t, "glTexImage3D"),
        Some(GlAction::BoundWithDepBoundTo {
            reg: Reg::Textures,
            dep: Reg::Buffers,
            target: GL_PIXEL_UNPACK_BUFFER
        })
    );
}

#[test]
fn corrected_entry_point_names_resolve() {
    let t = build_call_table(false);
    assert_eq!(
        lookup(&t, "glDeleteFramebuffersEXT"),
        Some(GlAction::Destroy(Reg::FramebuffersExt))
    );
    assert_eq!(
        lookup(&t, "glBindProgramPipeline"),
        Some(GlAction::Bind {
            reg: Reg::Pipelines,
            id_arg: 0
        })
    );
    assert_eq!(
        lookup(&t, "glBeginQueryIndexed"),
        Some(GlAction::BeginQuery { indexed: true })
    );
    assert_eq!(lookup(&t, "glDeleteSync"), Some(GlAction::Delete(Reg::Sync)));
}

#[test]
fn registry_classification() {
    assert!(Reg::Framebuffers.is_per_context());
    assert!(!Reg::FramebuffersExt.is_per_context());
    assert!(Reg::SHARED.iter().all(|r| !r.is_per_context()));
    assert_eq!(Reg::Sync.kind(), "sync object");
}
