use super::*;
use crate::foundation::error::TrimError;
use crate::gl::enums::*;
use crate::trace::frames::FrameType;
use crate::trimmer::frame_trimmer::{FrameTrimmer, Trimmer};

fn trimmer_with(opts: TrimOptions) -> FrameTrimmer<GlFrontEnd> {
    FrameTrimmer::new(GlFrontEnd::new(&opts), opts)
}

fn trimmer() -> FrameTrimmer<GlFrontEnd> {
    trimmer_with(TrimOptions::default())
}

fn swap(no: u64) -> TraceCall {
    TraceCall::new(no, "glXSwapBuffers").ending_frame()
}

fn call(no: u64, name: &str) -> TraceCall {
    TraceCall::new(no, name)
}

fn gen_names(no: u64, name: &str, ids: &[u64]) -> TraceCall {
    call(no, name)
        .with_arg("n", ids.len() as u64)
        .with_arg("ids", Value::uints(ids.iter().copied()))
}

fn create_context(no: u64, handle: u64, shared: u64) -> TraceCall {
    call(no, "glXCreateContext")
        .with_arg("dpy", Value::Pointer(1))
        .with_arg("vis", Value::Pointer(2))
        .with_arg("shareList", Value::Pointer(shared))
        .with_arg("direct", true)
        .with_ret(Value::Pointer(handle))
}

fn make_current(no: u64, handle: u64) -> TraceCall {
    call(no, "glXMakeCurrent")
        .with_arg("dpy", Value::Pointer(1))
        .with_arg("drawable", Value::Pointer(3))
        .with_arg("ctx", Value::Pointer(handle))
}

fn bind_texture(no: u64, id: u64) -> TraceCall {
    call(no, "glBindTexture")
        .with_arg("target", GL_TEXTURE_2D)
        .with_arg("texture", id)
}

fn run(t: &mut FrameTrimmer<GlFrontEnd>, calls: Vec<(TraceCall, FrameType)>) {
    for (c, frame) in calls {
        t.process_call(&c, frame).unwrap();
    }
    t.end_last_frame();
}

use FrameType::{None as Skip, Retain};

#[test]
fn texture_history_follows_the_bind_inside_the_frame() {
    let mut t = trimmer();
    run(
        &mut t,
        vec![
            (create_context(0, 0x10, 0), Skip),
            (make_current(1, 0x10), Skip),
            (gen_names(2, "glGenTextures", &[5]), Skip),
            (bind_texture(3, 5), Skip),
            (
                call(4, "glTexImage2D").with_arg("target", GL_TEXTURE_2D),
                Skip,
            ),
            (gen_names(5, "glGenTextures", &[6]), Skip),
            (bind_texture(6, 6), Skip),
            (
                call(7, "glTexParameteri").with_arg("target", GL_TEXTURE_2D),
                Skip,
            ),
            (bind_texture(8, 5), Skip),
            (swap(9), Skip),
            (call(10, "glDrawArrays"), Retain),
            (swap(11), Retain),
        ],
    );
    assert_eq!(t.sorted_call_ids(), vec![0, 1, 2, 3, 4, 8, 9, 10, 11]);
    assert!(t.diagnostics().is_empty());
}

#[test]
fn display_list_is_replayed_with_its_contents() {
    let mut t = trimmer();
    run(
        &mut t,
        vec![
            (
                call(0, "glGenLists").with_arg("range", 1u64).with_ret(1u64),
                Skip,
            ),
            (
                call(1, "glNewList")
                    .with_arg("list", 1u64)
                    .with_arg("mode", 0x1300u32),
                Skip,
            ),
            (call(2, "glBegin"), Skip),
            (call(3, "glVertex3f"), Skip),
            (call(4, "glEnd"), Skip),
            (call(5, "glEndList"), Skip),
            (call(6, "glBegin"), Skip),
            (call(7, "glEnd"), Skip),
            (swap(8), Skip),
            (call(9, "glCallList").with_arg("list", 1u64), Retain),
            (swap(10), Retain),
        ],
    );
    assert_eq!(t.sorted_call_ids(), vec![0, 1, 2, 3, 4, 5, 8, 9, 10]);
}

#[test]
fn memcpy_into_a_mapped_buffer_travels_with_the_buffer() {
    let mut t = trimmer();
    let bind = |no| {
        call(no, "glBindBuffer")
            .with_arg("target", GL_ARRAY_BUFFER)
            .with_arg("buffer", 3u64)
    };
    run(
        &mut t,
        vec![
            (gen_names(0, "glGenBuffers", &[3]), Skip),
            (gen_names(1, "glGenBuffers", &[4]), Skip),
            (bind(2), Skip),
            (
                call(3, "glBufferData")
                    .with_arg("target", GL_ARRAY_BUFFER)
                    .with_arg("size", 64u64),
                Skip,
            ),
            (
                call(4, "glMapBufferRange")
                    .with_arg("target", GL_ARRAY_BUFFER)
                    .with_arg("offset", 0u64)
                    .with_arg("length", 64u64)
                    .with_arg("access", 0x2u64)
                    .with_ret(Value::Pointer(0x1000)),
                Skip,
            ),
            (
                call(5, "memcpy")
                    .with_arg("dest", Value::Pointer(0x1000))
                    .with_arg("src", Value::Pointer(0x9000))
                    .with_arg("n", 16u64),
                Skip,
            ),
            (
                call(6, "glUnmapBuffer").with_arg("target", GL_ARRAY_BUFFER),
                Skip,
            ),
            (swap(7), Skip),
            (bind(8), Retain),
            (swap(9), Retain),
        ],
    );
    assert_eq!(t.sorted_call_ids(), vec![0, 2, 3, 4, 5, 6, 7, 8, 9]);
}

#[test]
fn memcpy_outside_every_mapping_is_fatal() {
    let mut t = trimmer();
    let err = t
        .process_call(
            &call(0, "memcpy")
                .with_arg("dest", Value::Pointer(0x5000))
                .with_arg("src", Value::Pointer(0x9000))
                .with_arg("n", 4u64),
            FrameType::None,
        )
        .unwrap_err();
    assert!(matches!(err, TrimError::UnmappedWrite(_)));
}

#[test]
fn delete_of_an_object_the_frame_never_used_is_dropped() {
    let mut t = trimmer();
    run(
        &mut t,
        vec![
            (gen_names(0, "glGenTextures", &[7]), Skip),
            (swap(1), Skip),
            (gen_names(2, "glDeleteTextures", &[7]), Retain),
            (swap(3), Retain),
        ],
    );
    assert_eq!(t.sorted_call_ids(), vec![1, 3]);
}

#[test]
fn draw_into_a_framebuffer_object_links_its_inputs() {
    let mut t = trimmer();
    run(
        &mut t,
        vec![
            (create_context(0, 0x10, 0), Skip),
            (make_current(1, 0x10), Skip),
            (gen_names(2, "glGenFramebuffers", &[2]), Skip),
            (
                call(3, "glBindFramebuffer")
                    .with_arg("target", GL_FRAMEBUFFER)
                    .with_arg("framebuffer", 2u64),
                Skip,
            ),
            (gen_names(4, "glGenTextures", &[9]), Skip),
            (bind_texture(5, 9), Skip),
            (
                call(6, "glFramebufferTexture2D")
                    .with_arg("target", GL_FRAMEBUFFER)
                    .with_arg("attachment", 0x8CE0u32)
                    .with_arg("textarget", GL_TEXTURE_2D)
                    .with_arg("texture", 9u64)
                    .with_arg("level", 0u64),
                Skip,
            ),
            (call(7, "glDrawArrays"), Skip),
            (
                call(8, "glBindFramebuffer")
                    .with_arg("target", GL_FRAMEBUFFER)
                    .with_arg("framebuffer", 0u64),
                Skip,
            ),
            (bind_texture(9, 0), Skip),
            (swap(10), Skip),
            (bind_texture(11, 9), Retain),
            (swap(12), Retain),
        ],
    );
    let kept = t.sorted_call_ids();
    assert!(kept.contains(&7), "draw into the attached framebuffer: {kept:?}");
    assert_eq!(kept, (0..=12).collect::<Vec<u64>>());
}

#[test]
fn per_context_state_without_a_context_creates_one_implicitly() {
    let mut t = trimmer();
    t.process_call(&gen_names(0, "glGenVertexArrays", &[1]), Skip).unwrap();
    t.process_call(
        &call(1, "glBindVertexArray").with_arg("array", 1u64),
        Skip,
    )
    .unwrap();
    assert_eq!(t.diagnostics().count(DiagnosticKind::NoCurrentContext), 1);
    assert_eq!(t.front_end().context_count(), 1);
    assert_eq!(t.front_end().current_context(), ContextId(0));
}

#[test]
fn thread_switch_restores_the_thread_context() {
    let mut t = trimmer();
    t.process_call(&create_context(0, 0x10, 0).on_thread(1), Skip).unwrap();
    t.process_call(&make_current(1, 0x10).on_thread(1), Skip).unwrap();
    t.process_call(&create_context(2, 0x20, 0x10).on_thread(2), Skip).unwrap();
    t.process_call(&make_current(3, 0x20).on_thread(2), Skip).unwrap();
    assert_eq!(t.front_end().current_context(), ContextId(2));

    t.process_call(&call(4, "glFlush").on_thread(1), Skip).unwrap();
    assert_eq!(t.front_end().current_context(), ContextId(1));
    assert_eq!(t.front_end().context_count(), 2);
}

#[test]
fn only_the_last_state_call_per_key_is_kept() {
    let stencil = |no| {
        call(no, "glStencilFunc")
            .with_arg("func", 0x0207u32)
            .with_arg("ref", 1u64)
            .with_arg("mask", 0xFFu64)
    };
    let calls = || {
        vec![
            (stencil(0), Skip),
            (stencil(1), Skip),
            (call(2, "glBlendFunc"), Skip),
            (swap(3), Skip),
            (call(4, "glDrawArrays"), Retain),
            (swap(5), Retain),
        ]
    };

    let mut t = trimmer();
    run(&mut t, calls());
    assert_eq!(t.sorted_call_ids(), vec![1, 2, 3, 4, 5]);

    let mut keep_all = trimmer_with(TrimOptions {
        keep_all_state_calls: true,
        ..TrimOptions::default()
    });
    run(&mut keep_all, calls());
    assert_eq!(keep_all.sorted_call_ids(), vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn matrix_load_discards_earlier_operations() {
    let mut t = trimmer();
    run(
        &mut t,
        vec![
            (call(0, "glMatrixMode").with_arg("mode", GL_PROJECTION), Skip),
            (call(1, "glOrtho"), Skip),
            (call(2, "glMatrixMode").with_arg("mode", GL_MODELVIEW), Skip),
            (call(3, "glTranslatef"), Skip),
            (call(4, "glLoadIdentity"), Skip),
            (swap(5), Skip),
            (call(6, "glDrawArrays"), Retain),
            (swap(7), Retain),
        ],
    );
    assert_eq!(t.sorted_call_ids(), vec![0, 1, 2, 4, 5, 6, 7]);
}

#[test]
fn bind_textures_links_the_bound_set() {
    let mut t = trimmer();
    run(
        &mut t,
        vec![
            (
                call(0, "glCreateTextures")
                    .with_arg("target", GL_TEXTURE_2D)
                    .with_arg("n", 2u64)
                    .with_arg("textures", Value::uints([4, 5])),
                Skip,
            ),
            (gen_names(1, "glGenTextures", &[6]), Skip),
            (
                call(2, "glBindTextures")
                    .with_arg("first", 0u64)
                    .with_arg("count", 3u64)
                    .with_arg("textures", Value::uints([4, 0, 6])),
                Skip,
            ),
            (
                call(3, "glTextureParameteri").with_arg("texture", 5u64),
                Skip,
            ),
            (swap(4), Skip),
            (call(5, "glDrawArrays"), Retain),
            (swap(6), Retain),
        ],
    );
    // Texture 6 has no target yet and is diagnosed; 4 and 5 share their creation.
    assert_eq!(t.sorted_call_ids(), vec![0, 2, 3, 4, 5, 6]);
    assert_eq!(t.diagnostics().count(DiagnosticKind::UnknownBindpoint), 1);
}

#[test]
fn unknown_entry_point_is_diagnosed_once_per_name() {
    let mut t = trimmer();
    t.process_call(&call(0, "glFrobnicate"), Skip).unwrap();
    t.process_call(&call(1, "glFrobnicate"), Skip).unwrap();
    assert_eq!(t.diagnostics().count(DiagnosticKind::UnhandledCall), 2);
    assert!(t.sorted_call_ids().is_empty());
}

#[test]
fn shader_compiled_in_the_last_frame_is_reported_for_looping() {
    let mut t = trimmer();
    let calls = [
        (
            call(0, "glCreateShader").with_arg("type", 0x8B31u32).with_ret(7u64),
            Skip,
        ),
        (call(1, "glShaderSource").with_arg("shader", 7u64), Skip),
        (swap(2), Skip),
    ];
    for (c, frame) in calls {
        t.process_call(&c, frame).unwrap();
    }
    t.start_last_frame(3);
    t.process_call(&call(3, "glCompileShader").with_arg("shader", 7u64), Retain)
        .unwrap();
    t.process_call(&swap(4), Retain).unwrap();
    t.end_last_frame();

    assert_eq!(t.skip_loop_calls().iter().copied().collect::<Vec<_>>(), vec![3]);
    assert!(t.sorted_call_ids().contains(&0));
}

#[test]
fn unmap_closes_the_mapping_for_later_writes() {
    let mut t = trimmer();
    let setup = [
        gen_names(0, "glGenBuffers", &[3]),
        call(1, "glBindBuffer")
            .with_arg("target", GL_ARRAY_BUFFER)
            .with_arg("buffer", 3u64),
        call(2, "glMapBufferRange")
            .with_arg("target", GL_ARRAY_BUFFER)
            .with_arg("offset", 0u64)
            .with_arg("length", 64u64)
            .with_arg("access", 0x2u64)
            .with_ret(Value::Pointer(0x1000)),
        call(3, "glUnmapBuffer").with_arg("target", GL_ARRAY_BUFFER),
    ];
    for c in &setup {
        t.process_call(c, Skip).unwrap();
    }
    let late = call(4, "memcpy")
        .with_arg("dest", Value::Pointer(0x1000))
        .with_arg("src", Value::Pointer(0x9000))
        .with_arg("n", 16u64);
    let err = t.process_call(&late, Skip).unwrap_err();
    assert!(matches!(err, TrimError::UnmappedWrite(_)));
}
