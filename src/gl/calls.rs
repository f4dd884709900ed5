use crate::foundation::ids::Bindpoint;
use crate::gl::enums::{GL_DRAW_FRAMEBUFFER, GL_PIXEL_UNPACK_BUFFER};
use crate::trimmer::dispatch::PrefixTable;

/// GL object registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg {
    LegacyPrograms,
    Programs,
    Shaders,
    Textures,
    Buffers,
    Renderbuffers,
    Samplers,
    Sync,
    AttribPointers,
    BufferPointers,
    Queries,
    FramebuffersExt,
    // Per context.
    VertexArrays,
    Pipelines,
    Framebuffers,
}

impl Reg {
    pub(crate) const SHARED: [Reg; 12] = [
        Reg::LegacyPrograms,
        Reg::Programs,
        Reg::Shaders,
        Reg::Textures,
        Reg::Buffers,
        Reg::Renderbuffers,
        Reg::Samplers,
        Reg::Sync,
        Reg::AttribPointers,
        Reg::BufferPointers,
        Reg::Queries,
        Reg::FramebuffersExt,
    ];

    pub(crate) fn kind(self) -> &'static str {
        match self {
            Reg::LegacyPrograms => "legacy program",
            Reg::Programs => "program",
            Reg::Shaders => "shader",
            Reg::Textures => "texture",
            Reg::Buffers => "buffer",
            Reg::Renderbuffers => "renderbuffer",
            Reg::Samplers => "sampler",
            Reg::Sync => "sync object",
            Reg::AttribPointers => "vertex attribute pointer",
            Reg::BufferPointers => "vertex buffer pointer",
            Reg::Queries => "query",
            Reg::FramebuffersExt => "EXT framebuffer",
            Reg::VertexArrays => "vertex array",
            Reg::Pipelines => "program pipeline",
            Reg::Framebuffers => "framebuffer",
        }
    }

    pub(crate) fn is_per_context(self) -> bool {
        matches!(self, Reg::VertexArrays | Reg::Pipelines | Reg::Framebuffers)
    }
}

/// Handler of one GL entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlAction {
    /// Kept unconditionally.
    Required,
    /// Queries without side effects; kept only inside the kept frames.
    IgnoreHistory,
    /// Last call per name and `selectors` leading arguments wins.
    State { selectors: u8 },
    /// Immediate-mode call, only relevant inside a display list.
    Immediate,
    GenLists,
    NewList,
    EndList,
    CallList,
    DeleteLists,
    MatrixMode,
    MatrixLoad,
    MatrixOp,
    PushMatrix,
    PopMatrix,
    /// `glGen*`-style: ids in the array argument `ids_arg`.
    Generate { reg: Reg, ids_arg: u8 },
    /// `glCreateTextures(target, n, ids)`.
    GenerateTextures,
    Destroy(Reg),
    /// Object id is the return value.
    Create(Reg),
    /// Object id is the first argument.
    Delete(Reg),
    Bind { reg: Reg, id_arg: u8 },
    BindWithCreate { reg: Reg, id_arg: u8 },
    BindBuffer,
    /// `glBindBufferRange` / `glBindBufferBase`.
    BindBufferIndexed,
    BindFramebuffer,
    BindVertexArray,
    BindMultiTexture,
    BindTextures,
    BindSamplers,
    BindImageTexture,
    ActiveTexture,
    BeginQuery { indexed: bool },
    EndQuery { indexed: bool },
    CallOnBound(Reg),
    CallOnNamed(Reg),
    /// Compile or link of the named object; repeating it in a looped frame is not a no-op.
    Rebuild(Reg),
    CallOnBoundTo { reg: Reg, bindpoint: Bindpoint },
    BoundWithDep { reg: Reg, dep: Reg, dep_arg: u8, reciprocal: bool },
    NamedWithDep { reg: Reg, dep: Reg, dep_arg: u8, reciprocal: bool },
    /// The object bound at `reg`'s bindpoint depends on what `dep` has bound at `target`.
    BoundWithDepBoundTo { reg: Reg, dep: Reg, target: u32 },
    NamedWithDepBoundTo { reg: Reg, dep: Reg, target: u32 },
    BufferData,
    NamedBufferData,
    MapBuffer { named: bool, range: bool },
    UnmapBuffer { named: bool },
    Memcpy,
    CopyBufferSubData { named: bool },
    CopyImageSubData,
    AttribPointer,
    BindVertexBuffer,
    Draw,
    Dispatch { indirect: bool },
    WaitSync,
    Blit,
    BlitNamed,
    ReadBuffer,
    CreateContext { shared_arg: Option<u8> },
    MakeCurrent { ctx_arg: u8 },
}

/// Build the name table. Earlier groups win over later ones for a repeated name.
pub(crate) fn build_call_table(keep_all_state_calls: bool) -> PrefixTable<GlAction> {
    let mut t = PrefixTable::new();
    register_state_calls(&mut t, keep_all_state_calls);
    register_legacy_calls(&mut t);
    register_required_calls(&mut t);
    register_framebuffer_calls(&mut t);
    register_buffer_calls(&mut t);
    register_program_calls(&mut t);
    register_vertex_array_calls(&mut t);
    register_texture_calls(&mut t);
    register_query_calls(&mut t);
    register_draw_calls(&mut t);
    register_ignore_history_calls(&mut t);
    t
}

const STATE_CALLS: &[&str] = &[
    "glAlphaFunc",
    "glBlendColor",
    "glBlendEquation",
    "glBlendEquationSeparate",
    "glBlendFunc",
    "glBlendFuncSeparate",
    "glClearColor",
    "glClearDepth",
    "glClearStencil",
    "glClipControl",
    "glColorMask",
    "glCullFace",
    "glDebugMessageCallback",
    "glDebugMessageControl",
    "glDepthFunc",
    "glDepthMask",
    "glDepthRange",
    "glDepthBounds",
    "glFlush",
    "glFrontFace",
    "glFrustum",
    "glLineStipple",
    "glLineWidth",
    "glListBase",
    "glLogicOp",
    "glMultiTexCoord",
    "glMemoryBarrier",
    "glPatchParameteri",
    "glPixelZoom",
    "glPointSize",
    "glPolygonMode",
    "glPolygonOffset",
    "glPolygonStipple",
    "glPopAttrib",
    "glPopClientAttrib",
    "glProvokingVertex",
    "glPrimitiveRestartIndex",
    "glPrimitiveBoundingBox",
    "glRasterPos",
    "glSampleCoverage",
    "glShadeModel",
    "glScissor",
    "glStencilMask",
    "glFinish",
];

// Keyed by the first argument as well.
const STATE_CALLS_1: &[&str] = &[
    "glActiveStencilFace",
    "glClampColor",
    "glClipPlane",
    "glColorMaskIndexedEXT",
    "glColorMaterial",
    "glFog",
    "glHint",
    "glLight",
    "glLightModel",
    "glMinSampleShading",
    "glPatchParameterfv",
    "glPixelTransfer",
    "glPointParameter",
    "glPushAttrib",
    "glPushClientAttrib",
    "glRenderMode",
    "glSampleMaski",
    "glScissorIndexed",
    "glStencilOp",
    "glStencilOpSeparate",
    "glStencilFunc",
    "glStencilFuncSeparate",
    "glVertexAttribDivisor",
];

const STATE_CALLS_2: &[&str] = &["glMaterial", "glTexEnv"];

fn register_state_calls(t: &mut PrefixTable<GlAction>, keep_all: bool) {
    let groups: [(&[&'static str], u8); 3] =
        [(STATE_CALLS, 0), (STATE_CALLS_1, 1), (STATE_CALLS_2, 2)];
    for (names, selectors) in groups {
        let action = if keep_all {
            GlAction::Required
        } else {
            GlAction::State { selectors }
        };
        t.insert_all(names, action);
    }

    t.insert_all(
        &["glDisable", "glDisablei", "glEnable", "glEnablei"],
        GlAction::Required,
    );

    t.insert("glFenceSync", GlAction::Create(Reg::Sync));
    t.insert("glWaitSync", GlAction::WaitSync);
    t.insert("glClientWaitSync", GlAction::WaitSync);
    t.insert("glDeleteSync", GlAction::Delete(Reg::Sync));
}

fn register_legacy_calls(t: &mut PrefixTable<GlAction>) {
    t.insert_all(&["glBegin", "glEnd"], GlAction::Immediate);
    t.insert_all(
        &[
            "glColor2",
            "glColor3",
            "glColor4",
            "glNormal",
            "glRect",
            "glTexCoord2",
            "glTexCoord3",
            "glTexCoord4",
            "glVertex2",
            "glVertex3",
            "glVertex4",
        ],
        GlAction::Immediate,
    );

    t.insert("glCallList", GlAction::CallList);
    t.insert("glDeleteLists", GlAction::DeleteLists);
    t.insert("glEndList", GlAction::EndList);
    t.insert("glGenLists", GlAction::GenLists);
    t.insert("glNewList", GlAction::NewList);

    let legacy = Reg::LegacyPrograms;
    t.insert(
        "glGenPrograms",
        GlAction::Generate {
            reg: legacy,
            ids_arg: 1,
        },
    );
    t.insert(
        "glBindProgram",
        GlAction::BindWithCreate {
            reg: legacy,
            id_arg: 1,
        },
    );
    t.insert("glDeletePrograms", GlAction::Destroy(legacy));
    t.insert_all(
        &[
            "glProgramString",
            "glProgramLocalParameter",
            "glProgramEnvParameter",
        ],
        GlAction::CallOnBound(legacy),
    );
    t.insert_all(
        &["glNamedProgramLocalParameter", "glNamedProgramEnvParameter"],
        GlAction::CallOnNamed(legacy),
    );

    t.insert_all(&["glLoadIdentity", "glLoadMatrix"], GlAction::MatrixLoad);
    t.insert("glMatrixMode", GlAction::MatrixMode);
    t.insert_all(
        &[
            "glMultMatrix",
            "glOrtho",
            "glRotate",
            "glScale",
            "glTranslate",
        ],
        GlAction::MatrixOp,
    );
    t.insert("glPopMatrix", GlAction::PopMatrix);
    t.insert("glPushMatrix", GlAction::PushMatrix);

    t.insert("glDispatchCompute", GlAction::Dispatch { indirect: false });
    t.insert(
        "glDispatchComputeIndirect",
        GlAction::Dispatch { indirect: true },
    );
}

fn register_required_calls(t: &mut PrefixTable<GlAction>) {
    t.insert_all(
        &[
            "glXChooseVisual",
            "glXCreatePbuffer",
            "glXCreateWindow",
            "glXDestroyContext",
            "glXGetFBConfigAttrib",
            "glXChooseFBConfig",
            "glXQueryExtension",
            "glXQueryExtensionsString",
            "glXSwapIntervalMESA",
            "glXWaitGL",
            "eglGetDisplay",
            "eglChooseConfig",
            "eglInitialize",
            "eglCreatePlatformWindowSurface",
            "eglCreateWindowSurface",
            "eglDestroyContext",
            "eglDestroySurface",
            "eglBindAPI",
            "eglSwapInterval",
            "eglTerminate",
            "wglChoosePixelFormat",
            "wglSetPixelFormat",
            "wglSwapIntervalEXT",
            "glPixelStorei",
        ],
        GlAction::Required,
    );

    let create = |shared_arg| GlAction::CreateContext { shared_arg };
    t.insert("glXCreateContext", create(Some(2)));
    t.insert("glXCreateNewContext", create(Some(3)));
    t.insert("glXCreateContextAttribs", create(Some(2)));
    t.insert("eglCreateContext", create(Some(2)));
    t.insert("wglCreateContext", create(None));
    t.insert("wglCreateContextAttribs", create(Some(1)));

    let make_current = |ctx_arg| GlAction::MakeCurrent { ctx_arg };
    t.insert("glXMakeCurrent", make_current(2));
    t.insert("glXMakeContextCurrent", make_current(3));
    t.insert("eglMakeCurrent", make_current(3));
    t.insert("wglMakeCurrent", make_current(1));
}

fn register_framebuffer_calls(t: &mut PrefixTable<GlAction>) {
    let rb = Reg::Renderbuffers;
    t.insert("glBindRenderbuffer", GlAction::Bind { reg: rb, id_arg: 1 });
    t.insert("glDeleteRenderbuffers", GlAction::Destroy(rb));
    t.insert_all(
        &["glGenRenderbuffers", "glCreateRenderbuffers"],
        GlAction::Generate { reg: rb, ids_arg: 1 },
    );
    t.insert_all(
        &["glRenderbufferStorage", "glRenderbufferStorageMultisample"],
        GlAction::CallOnBound(rb),
    );
    t.insert("glNamedRenderbufferStorage", GlAction::CallOnNamed(rb));

    let fb = Reg::Framebuffers;
    let on_draw_fb = GlAction::CallOnBoundTo {
        reg: fb,
        bindpoint: GL_DRAW_FRAMEBUFFER,
    };
    t.insert_all(
        &["glGenFramebuffers", "glCreateFramebuffers"],
        GlAction::Generate { reg: fb, ids_arg: 1 },
    );
    t.insert("glDeleteFramebuffers", GlAction::Destroy(fb));
    t.insert("glBindFramebuffer", GlAction::BindFramebuffer);
    t.insert("glViewport", on_draw_fb);

    t.insert("glBlitFramebuffer", GlAction::Blit);
    t.insert("glBlitNamedFramebuffer", GlAction::BlitNamed);

    let attach = |dep, dep_arg| GlAction::BoundWithDep {
        reg: fb,
        dep,
        dep_arg,
        reciprocal: true,
    };
    let attach_named = |dep, dep_arg| GlAction::NamedWithDep {
        reg: fb,
        dep,
        dep_arg,
        reciprocal: true,
    };
    t.insert("glFramebufferTexture", attach(Reg::Textures, 2));
    t.insert("glFramebufferTextureLayer", attach(Reg::Textures, 2));
    t.insert("glFramebufferTexture1D", attach(Reg::Textures, 3));
    t.insert("glFramebufferTexture2D", attach(Reg::Textures, 3));
    t.insert("glFramebufferTexture3D", attach(Reg::Textures, 3));
    t.insert("glFramebufferRenderbuffer", attach(rb, 3));
    t.insert("glNamedFramebufferTexture", attach_named(Reg::Textures, 2));
    t.insert(
        "glNamedFramebufferTextureLayer",
        attach_named(Reg::Textures, 2),
    );
    t.insert("glNamedFramebufferRenderbuffer", attach_named(rb, 3));

    t.insert_all(
        &[
            "glNamedFramebufferDrawBuffer",
            "glNamedFramebufferDrawBuffers",
            "glNamedFramebufferReadBuffer",
            "glCheckNamedFramebufferStatus",
            "glInvalidateNamedFramebufferData",
            "glInvalidateNamedFramebufferSubData",
            "glClearNamedFramebuffer",
            "glClearNamedFramebufferfi",
        ],
        GlAction::CallOnNamed(fb),
    );
    t.insert("glReadBuffer", GlAction::ReadBuffer);
    t.insert_all(
        &[
            "glDrawBuffer",
            "glDrawBuffers",
            "glClearBuffer",
            "glClearBufferfi",
            "glClearBufferfv",
            "glClearBufferiv",
            "glClear",
        ],
        on_draw_fb,
    );
    t.insert("glInvalidateFramebuffer", GlAction::CallOnBound(fb));

    let ext = Reg::FramebuffersExt;
    t.insert(
        "glGenFramebuffersEXT",
        GlAction::Generate {
            reg: ext,
            ids_arg: 1,
        },
    );
    t.insert("glDeleteFramebuffersEXT", GlAction::Destroy(ext));
    t.insert("glBindFramebufferEXT", GlAction::Bind { reg: ext, id_arg: 1 });
    let attach_ext = |dep| GlAction::BoundWithDep {
        reg: ext,
        dep,
        dep_arg: 3,
        reciprocal: true,
    };
    t.insert("glFramebufferTexture1DEXT", attach_ext(Reg::Textures));
    t.insert("glFramebufferTexture2DEXT", attach_ext(Reg::Textures));
    t.insert("glFramebufferTexture3DEXT", attach_ext(Reg::Textures));
    t.insert("glFramebufferRenderbufferEXT", attach_ext(rb));
}

fn register_buffer_calls(t: &mut PrefixTable<GlAction>) {
    let buf = Reg::Buffers;
    t.insert_all(
        &["glGenBuffers", "glCreateBuffers"],
        GlAction::Generate {
            reg: buf,
            ids_arg: 1,
        },
    );
    t.insert("glDeleteBuffers", GlAction::Destroy(buf));

    t.insert("glBindBuffer", GlAction::BindBuffer);
    t.insert("glBindBufferRange", GlAction::BindBufferIndexed);
    t.insert("glBindBufferBase", GlAction::BindBufferIndexed);

    t.insert_all(&["glBufferData", "glBufferStorage"], GlAction::BufferData);
    t.insert_all(
        &["glNamedBufferData", "glNamedBufferStorage"],
        GlAction::NamedBufferData,
    );
    t.insert_all(
        &[
            "glBufferSubData",
            "glGetBufferSubData",
            "glFlushMappedBufferRange",
            "glClearBufferData",
        ],
        GlAction::CallOnBound(buf),
    );
    t.insert_all(
        &[
            "glNamedBufferSubData",
            "glGetNamedBufferSubData",
            "glFlushMappedNamedBufferRange",
            "glClearNamedBufferData",
            "glInvalidateBufferData",
        ],
        GlAction::CallOnNamed(buf),
    );
    t.insert(
        "glCopyBufferSubData",
        GlAction::CopyBufferSubData { named: false },
    );
    t.insert(
        "glCopyNamedBufferSubData",
        GlAction::CopyBufferSubData { named: true },
    );

    let map = |named, range| GlAction::MapBuffer { named, range };
    t.insert("glMapBuffer", map(false, false));
    t.insert("glMapBufferRange", map(false, true));
    t.insert("glMapNamedBuffer", map(true, false));
    t.insert("glMapNamedBufferRange", map(true, true));
    t.insert("glUnmapBuffer", GlAction::UnmapBuffer { named: false });
    t.insert("glUnmapNamedBuffer", GlAction::UnmapBuffer { named: true });
    t.insert("memcpy", GlAction::Memcpy);
}

fn register_draw_calls(t: &mut PrefixTable<GlAction>) {
    t.insert_all(
        &[
            "glDrawArrays",
            "glDrawElements",
            "glDrawElementsBaseVertex",
            "glDrawRangeElements",
            "glDrawRangeElementsBaseVertex",
            "glDrawArraysInstanced",
            "glDrawArraysInstancedBaseInstance",
            "glDrawElementsInstanced",
            "glDrawElementsInstancedBaseVertex",
            "glDrawElementsInstancedBaseVertexBaseInstance",
            "glDrawArraysIndirect",
            "glDrawElementsIndirect",
            "glMultiDrawArrays",
            "glMultiDrawArraysIndirect",
            "glMultiDrawElements",
            "glMultiDrawElementsIndirect",
        ],
        GlAction::Draw,
    );
}

fn register_program_calls(t: &mut PrefixTable<GlAction>) {
    let prog = Reg::Programs;
    let shader = Reg::Shaders;
    t.insert_all(
        &["glAttachObject", "glAttachShader"],
        GlAction::NamedWithDep {
            reg: prog,
            dep: shader,
            dep_arg: 1,
            reciprocal: false,
        },
    );

    t.insert("glShaderSource", GlAction::CallOnNamed(shader));
    t.insert("glCompileShader", GlAction::Rebuild(shader));
    t.insert("glLinkProgram", GlAction::Rebuild(prog));
    t.insert_all(
        &["glCreateShader", "glCreateShaderObject"],
        GlAction::Create(shader),
    );
    t.insert("glDeleteShader", GlAction::Delete(shader));

    t.insert_all(
        &["glCreateProgram", "glCreateProgramObject"],
        GlAction::Create(prog),
    );
    t.insert("glDeleteProgram", GlAction::Delete(prog));
    t.insert_all(
        &[
            "glBindAttribLocation",
            "glGetActiveAttrib",
            "glDetachShader",
            "glGetAttachedShaders",
            "glGetAttribLocation",
            "glGetUniformLocation",
            "glGetUniformBlockIndex",
            "glBindFragDataLocation",
            "glProgramBinary",
            "glProgramUniform",
            "glUniformBlockBinding",
            "glProgramParameter",
            "glShaderStorageBlockBinding",
        ],
        GlAction::CallOnNamed(prog),
    );
    t.insert_all(&["glUniform", "glUniformMatrix"], GlAction::CallOnBound(prog));
    t.insert_all(
        &["glUseProgram", "glUseProgramObject"],
        GlAction::Bind {
            reg: prog,
            id_arg: 0,
        },
    );

    let pipe = Reg::Pipelines;
    t.insert(
        "glGenProgramPipelines",
        GlAction::Generate {
            reg: pipe,
            ids_arg: 1,
        },
    );
    t.insert("glDeleteProgramPipelines", GlAction::Destroy(pipe));
    t.insert(
        "glBindProgramPipeline",
        GlAction::Bind {
            reg: pipe,
            id_arg: 0,
        },
    );
    let uses_program = |dep_arg| GlAction::NamedWithDep {
        reg: pipe,
        dep: prog,
        dep_arg,
        reciprocal: false,
    };
    t.insert("glUseProgramStages", uses_program(2));
    t.insert("glActiveShaderProgram", uses_program(1));
}

fn register_texture_calls(t: &mut PrefixTable<GlAction>) {
    let tex = Reg::Textures;
    t.insert(
        "glGenTextures",
        GlAction::Generate {
            reg: tex,
            ids_arg: 1,
        },
    );
    t.insert("glCreateTextures", GlAction::GenerateTextures);
    t.insert("glDeleteTextures", GlAction::Destroy(tex));

    t.insert("glActiveTexture", GlAction::ActiveTexture);
    t.insert("glBindTexture", GlAction::Bind { reg: tex, id_arg: 1 });
    t.insert("glBindMultiTexture", GlAction::BindMultiTexture);

    t.insert("glGenerateMipmap", GlAction::CallOnBound(tex));
    t.insert("glGenerateTextureMipmap", GlAction::CallOnNamed(tex));

    let unpack = GlAction::BoundWithDepBoundTo {
        reg: tex,
        dep: Reg::Buffers,
        target: GL_PIXEL_UNPACK_BUFFER,
    };
    let unpack_named = GlAction::NamedWithDepBoundTo {
        reg: tex,
        dep: Reg::Buffers,
        target: GL_PIXEL_UNPACK_BUFFER,
    };
    t.insert_all(
        &[
            "glTexImage1D",
            "glTexImage2D",
            "glTexImage2DMultisample",
            "glTexImage3D",
            "glTexSubImage1D",
            "glTexSubImage2D",
            "glTexSubImage3D",
            "glCompressedTexImage2D",
            "glCompressedTexSubImage2D",
            "glCompressedTexSubImage3D",
        ],
        unpack,
    );
    t.insert_all(
        &[
            "glTextureImage1D",
            "glTextureSubImage1D",
            "glTextureImage2D",
            "glTextureSubImage2D",
            "glTextureImage3D",
            "glTextureSubImage3D",
            "glCompressedTextureSubImage2DEXT",
        ],
        unpack_named,
    );

    t.insert_all(
        &[
            "glTexStorage1D",
            "glTexStorage2D",
            "glTexStorage2DMultisample",
            "glTexStorage3D",
            "glTexStorage3DMultisample",
            "glTexImage3DMultisample",
            "glTexParameter",
            "glCopyTexSubImage1D",
            "glCopyTexSubImage2D",
            "glCopyTexImage1D",
            "glCopyTexImage2D",
        ],
        GlAction::CallOnBound(tex),
    );
    t.insert_all(
        &[
            "glTextureStorage2D",
            "glClearTexImage",
            "glClearTexSubImage",
            "glTextureParameter",
        ],
        GlAction::CallOnNamed(tex),
    );
    t.insert(
        "glTextureView",
        GlAction::NamedWithDep {
            reg: tex,
            dep: tex,
            dep_arg: 2,
            reciprocal: true,
        },
    );
    t.insert(
        "glTexBuffer",
        GlAction::BoundWithDep {
            reg: tex,
            dep: Reg::Buffers,
            dep_arg: 2,
            reciprocal: true,
        },
    );
    t.insert(
        "glTextureBuffer",
        GlAction::NamedWithDep {
            reg: tex,
            dep: Reg::Buffers,
            dep_arg: 2,
            reciprocal: true,
        },
    );

    t.insert("glCopyImageSubData", GlAction::CopyImageSubData);
    t.insert("glBindImageTexture", GlAction::BindImageTexture);

    let samp = Reg::Samplers;
    t.insert("glBindSampler", GlAction::Bind { reg: samp, id_arg: 1 });
    t.insert(
        "glGenSamplers",
        GlAction::Generate {
            reg: samp,
            ids_arg: 1,
        },
    );
    t.insert("glDeleteSamplers", GlAction::Destroy(samp));
    t.insert("glSamplerParameter", GlAction::CallOnNamed(samp));
    t.insert("glBindTextures", GlAction::BindTextures);
    t.insert("glBindSamplers", GlAction::BindSamplers);
}

fn register_query_calls(t: &mut PrefixTable<GlAction>) {
    let q = Reg::Queries;
    t.insert("glGenQueries", GlAction::Generate { reg: q, ids_arg: 1 });
    t.insert("glDeleteQueries", GlAction::Destroy(q));
    t.insert("glBeginQuery", GlAction::BeginQuery { indexed: false });
    t.insert("glBeginQueryIndexed", GlAction::BeginQuery { indexed: true });
    t.insert("glEndQuery", GlAction::EndQuery { indexed: false });
    t.insert("glEndQueryIndexed", GlAction::EndQuery { indexed: true });
    t.insert_all(
        &["glGetQueryObject", "glQueryCounter"],
        GlAction::CallOnNamed(q),
    );
    t.insert("glGetQueryiv", GlAction::CallOnBound(q));
}

fn register_vertex_array_calls(t: &mut PrefixTable<GlAction>) {
    let vao = Reg::VertexArrays;
    t.insert(
        "glGenVertexArrays",
        GlAction::Generate {
            reg: vao,
            ids_arg: 1,
        },
    );
    t.insert("glDeleteVertexArrays", GlAction::Destroy(vao));
    t.insert("glBindVertexArray", GlAction::BindVertexArray);

    t.insert_all(
        &[
            "glVertexAttribPointer",
            "glVertexAttribIPointer",
            "glVertexAttribLPointer",
        ],
        GlAction::AttribPointer,
    );
    t.insert("glBindVertexBuffer", GlAction::BindVertexBuffer);

    t.insert_all(
        &[
            "glDisableVertexAttribArray",
            "glEnableVertexAttribArray",
            "glColorPointer",
            "glVertexPointer",
            "glNormalPointer",
            "glTexCoordPointer",
            "glVertexAttribBinding",
            "glVertexAttribFormat",
            "glVertexAttribIFormat",
            "glVertexAttribLFormat",
            "glVertexBindingDivisor",
            "glVertexAttrib1",
            "glVertexAttrib2",
            "glVertexAttrib3",
            "glVertexAttrib4",
            "glVertexAttribI",
            "glVertexAttribL",
            "glVertexAttribP1",
            "glVertexAttribP2",
            "glVertexAttribP3",
            "glVertexAttribP4",
            "glTexGen",
            "glTextureBarrier",
            "glClientActiveTexture",
            "glDisableClientState",
            "glEnableClientState",
        ],
        GlAction::Required,
    );
}

fn register_ignore_history_calls(t: &mut PrefixTable<GlAction>) {
    t.insert_all(
        &[
            "glCheckFramebufferStatus",
            "glGetActiveUniform",
            "glGetActiveUniforms",
            "glGetActiveUniformName",
            "glGetActiveUniformBlockName",
            "glGetActiveUniformBlock",
            "glGetBoolean",
            "glGetError",
            "glGetFloat",
            "glGetFramebufferAttachmentParameter",
            "glGetFramebufferParameteriv",
            "glGetInfoLog",
            "glGetInteger",
            "glGetIntegeri_v",
            "glGetNamedFramebufferAttachmentParameteriv",
            "glGetNamedFramebufferParameteriv",
            "glGetObjectLabelEXT",
            "glGetObjectParameter",
            "glGetProgram",
            "glGetProgramInfoLog",
            "glGetShader",
            "glGetString",
            "glGetShaderInfoLog",
            "glGetTexLevelParameter",
            "glGetTexParameter",
            "glGetTexImage",
            "glGetUniform",
            "glLabelObjectEXT",
            "glIsEnabled",
            "glIsFramebuffer",
            "glIsRenderbuffer",
            "glIsSync",
            "glIsTexture",
            "glIsVertexArray",
            "glReadPixels",
            "glXGetClientString",
            "glXGetCurrentContext",
            "glXGetCurrentDisplay",
            "glXGetCurrentDrawable",
            "glXGetFBConfigs",
            "glXGetProcAddress",
            "glXGetSwapIntervalMESA",
            "glXGetVisualFromFBConfig",
            "glXQueryDrawable",
            "glXQueryVersion",
            "glXSwapIntervalEXT",
            "eglGetProcAddress",
            "eglQueryString",
            "eglGetError",
            "eglGetPlatformDisplay",
            "eglGetConfigs",
            "eglGetConfigAttrib",
            "eglGetCurrentContext",
            "eglGetCurrentDisplay",
            "eglGetCurrentSurface",
            "eglQuerySurface",
            "wglGetCurrentDC",
            "wglGetCurrentContext",
            "wglGetProcAddress",
            "wglGetExtensionsString",
            "wglGetPixelFormat",
            "wglDeleteContext",
            "wglDescribePixelFormat",
        ],
        GlAction::IgnoreHistory,
    );
}

#[cfg(test)]
#[path = "../../tests/unit/gl/calls.rs"]
mod tests;
