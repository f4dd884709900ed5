use std::collections::HashMap;

/// Shader stage a binding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Vertex,
    Hull,
    Domain,
    Geometry,
    Pixel,
    Compute,
}

impl Stage {
    const ALL: [Stage; 6] = [
        Stage::Vertex,
        Stage::Hull,
        Stage::Domain,
        Stage::Geometry,
        Stage::Pixel,
        Stage::Compute,
    ];

    fn prefix(self) -> &'static str {
        match self {
            Stage::Vertex => "VS",
            Stage::Hull => "HS",
            Stage::Domain => "DS",
            Stage::Geometry => "GS",
            Stage::Pixel => "PS",
            Stage::Compute => "CS",
        }
    }
}

/// Kind of object a context binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BindingKind {
    Shaders,
    Samplers,
    InputLayout,
    VertexBuffers,
    IndexBuffer,
    ConstantBuffers,
    ShaderResources,
    RenderTargets,
    DepthStencilView,
    UnorderedAccessViews,
    StreamOutTargets,
}

/// Pipeline state set by a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StateKind {
    Blend,
    DepthStencil,
    Rasterizer,
    Viewport,
    Scissor,
    Topology,
}

/// Handler of one Direct3D11 or DXGI entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum D3dAction {
    // Global functions.
    CreateFactory,
    /// `D3D11CreateDevice*`; the swap chain variant carries its descriptor and out argument.
    CreateDevice {
        device_arg: u8,
        swap_chain: Option<(u8, u8)>,
    },
    Memcpy,

    // IUnknown and IDXGIObject.
    AddRef,
    Release,
    QueryInterface,
    GetParent,

    // IDXGIFactory.
    /// `nested`: width and height sit in the descriptor's first member.
    CreateSwapChain {
        desc_arg: u8,
        out_arg: u8,
        nested: bool,
    },
    EnumAdapters,

    // IDXGISwapChain.
    ResizeBuffers,
    ResizeTarget,
    GetBuffer,
    Present,

    // ID3D11Device.
    GetImmediateContext,
    CreateDeferredContext,
    /// Object without resource semantics, optionally depending on another argument.
    CreateChild {
        out_arg: u8,
        dep_arg: Option<u8>,
    },
    CreateDepthStencilState,
    CreateBuffer,
    CreateTexture {
        dims: u8,
    },
    CreateView,

    // ID3D11DeviceContext.
    FinishCommandList,
    ExecuteCommandList,
    ClearState,
    BindSlot {
        kind: BindingKind,
        arg: u8,
    },
    BindSlots {
        kind: BindingKind,
        stage: Stage,
    },
    SetObjects {
        kind: BindingKind,
        arg: u8,
    },
    SetState(StateKind),
    BindState(StateKind),
    SetRenderTargets {
        uavs: bool,
    },
    GetRenderTargets,
    SetShader(Stage),
    ClearView,
    Map,
    Unmap,
    UpdateSubresource,
    CopyResource,
    CopySubresourceRegion,
    CopyStructureCount,
    GenerateMips,
    Begin,
    End,
    Draw {
        indirect: bool,
    },
    Dispatch {
        indirect: bool,
    },
}

type Methods = Vec<(String, D3dAction)>;

fn methods(entries: &[(&str, D3dAction)]) -> Methods {
    entries.iter().map(|&(n, a)| (n.to_owned(), a)).collect()
}

fn unknown_methods() -> Methods {
    methods(&[
        ("AddRef", D3dAction::AddRef),
        ("Release", D3dAction::Release),
        ("QueryInterface", D3dAction::QueryInterface),
    ])
}

fn factory_methods() -> Methods {
    methods(&[
        (
            "CreateSwapChain",
            D3dAction::CreateSwapChain {
                desc_arg: 2,
                out_arg: 3,
                nested: true,
            },
        ),
        (
            "CreateSwapChainForHwnd",
            D3dAction::CreateSwapChain {
                desc_arg: 3,
                out_arg: 6,
                nested: false,
            },
        ),
        (
            "CreateSwapChainForCoreWindow",
            D3dAction::CreateSwapChain {
                desc_arg: 3,
                out_arg: 5,
                nested: false,
            },
        ),
        ("EnumAdapters", D3dAction::EnumAdapters),
        ("EnumAdapters1", D3dAction::EnumAdapters),
    ])
}

fn swap_chain_methods() -> Methods {
    methods(&[
        ("ResizeBuffers", D3dAction::ResizeBuffers),
        ("ResizeTarget", D3dAction::ResizeTarget),
        ("GetBuffer", D3dAction::GetBuffer),
        ("Present", D3dAction::Present),
        ("Present1", D3dAction::Present),
    ])
}

fn device_methods() -> Methods {
    let state = D3dAction::CreateChild {
        out_arg: 2,
        dep_arg: None,
    };
    let shader = D3dAction::CreateChild {
        out_arg: 4,
        dep_arg: Some(3),
    };
    methods(&[
        ("GetImmediateContext", D3dAction::GetImmediateContext),
        ("CreateDeferredContext", D3dAction::CreateDeferredContext),
        ("CreateBlendState", state),
        ("CreateDepthStencilState", D3dAction::CreateDepthStencilState),
        ("CreateRasterizerState", state),
        ("CreateSamplerState", state),
        ("CreateVertexShader", shader),
        ("CreateHullShader", shader),
        ("CreateDomainShader", shader),
        ("CreateGeometryShader", shader),
        ("CreatePixelShader", shader),
        ("CreateComputeShader", shader),
        (
            "CreateGeometryShaderWithStreamOutput",
            D3dAction::CreateChild {
                out_arg: 9,
                dep_arg: Some(8),
            },
        ),
        ("CreateBuffer", D3dAction::CreateBuffer),
        ("CreateTexture1D", D3dAction::CreateTexture { dims: 1 }),
        ("CreateTexture2D", D3dAction::CreateTexture { dims: 2 }),
        ("CreateTexture3D", D3dAction::CreateTexture { dims: 3 }),
        ("CreateShaderResourceView", D3dAction::CreateView),
        ("CreateUnorderedAccessView", D3dAction::CreateView),
        ("CreateRenderTargetView", D3dAction::CreateView),
        ("CreateDepthStencilView", D3dAction::CreateView),
        ("CreateQuery", state),
        ("CreatePredicate", state),
        ("CreateCounter", state),
        (
            "CreateClassLinkage",
            D3dAction::CreateChild {
                out_arg: 1,
                dep_arg: None,
            },
        ),
        (
            "CreateInputLayout",
            D3dAction::CreateChild {
                out_arg: 5,
                dep_arg: None,
            },
        ),
    ])
}

fn context_methods() -> Methods {
    let mut m = methods(&[
        ("FinishCommandList", D3dAction::FinishCommandList),
        ("ExecuteCommandList", D3dAction::ExecuteCommandList),
        ("ClearState", D3dAction::ClearState),
        (
            "IASetIndexBuffer",
            D3dAction::BindSlot {
                kind: BindingKind::IndexBuffer,
                arg: 1,
            },
        ),
        (
            "IASetVertexBuffers",
            D3dAction::BindSlots {
                kind: BindingKind::VertexBuffers,
                stage: Stage::Vertex,
            },
        ),
        (
            "IASetInputLayout",
            D3dAction::BindSlot {
                kind: BindingKind::InputLayout,
                arg: 1,
            },
        ),
        (
            "IASetPrimitiveTopology",
            D3dAction::SetState(StateKind::Topology),
        ),
        ("OMSetBlendState", D3dAction::BindState(StateKind::Blend)),
        (
            "OMSetDepthStencilState",
            D3dAction::BindState(StateKind::DepthStencil),
        ),
        (
            "OMSetRenderTargets",
            D3dAction::SetRenderTargets { uavs: false },
        ),
        (
            "OMSetRenderTargetsAndUnorderedAccessViews",
            D3dAction::SetRenderTargets { uavs: true },
        ),
        ("OMGetRenderTargets", D3dAction::GetRenderTargets),
        ("RSSetViewports", D3dAction::SetState(StateKind::Viewport)),
        ("RSSetScissorRects", D3dAction::SetState(StateKind::Scissor)),
        ("RSSetState", D3dAction::BindState(StateKind::Rasterizer)),
        (
            "SOSetTargets",
            D3dAction::SetObjects {
                kind: BindingKind::StreamOutTargets,
                arg: 2,
            },
        ),
        (
            "CSSetUnorderedAccessViews",
            D3dAction::BindSlots {
                kind: BindingKind::UnorderedAccessViews,
                stage: Stage::Compute,
            },
        ),
        ("ClearRenderTargetView", D3dAction::ClearView),
        ("ClearDepthStencilView", D3dAction::ClearView),
        ("ClearUnorderedAccessViewFloat", D3dAction::ClearView),
        ("ClearUnorderedAccessViewUint", D3dAction::ClearView),
        ("Map", D3dAction::Map),
        ("Unmap", D3dAction::Unmap),
        ("UpdateSubresource", D3dAction::UpdateSubresource),
        ("CopyResource", D3dAction::CopyResource),
        ("CopySubresourceRegion", D3dAction::CopySubresourceRegion),
        ("CopyStructureCount", D3dAction::CopyStructureCount),
        ("GenerateMips", D3dAction::GenerateMips),
        ("Begin", D3dAction::Begin),
        ("End", D3dAction::End),
        ("Draw", D3dAction::Draw { indirect: false }),
        ("DrawAuto", D3dAction::Draw { indirect: false }),
        ("DrawIndexed", D3dAction::Draw { indirect: false }),
        ("DrawInstanced", D3dAction::Draw { indirect: false }),
        ("DrawIndexedInstanced", D3dAction::Draw { indirect: false }),
        ("DrawInstancedIndirect", D3dAction::Draw { indirect: true }),
        (
            "DrawIndexedInstancedIndirect",
            D3dAction::Draw { indirect: true },
        ),
        ("Dispatch", D3dAction::Dispatch { indirect: false }),
        ("DispatchIndirect", D3dAction::Dispatch { indirect: true }),
    ]);
    // Per-stage entry points are named `<stage>Set<kind>`.
    for stage in Stage::ALL {
        let p = stage.prefix();
        m.push((format!("{p}SetShader"), D3dAction::SetShader(stage)));
        for (suffix, kind) in [
            ("SetSamplers", BindingKind::Samplers),
            ("SetShaderResources", BindingKind::ShaderResources),
            ("SetConstantBuffers", BindingKind::ConstantBuffers),
        ] {
            m.push((format!("{p}{suffix}"), D3dAction::BindSlots { kind, stage }));
        }
    }
    m
}

// Device children the trimmer only needs for reference counting.
const PLAIN_CHILDREN: &[&str] = &[
    "ID3D11ShaderResourceView",
    "ID3D11RenderTargetView",
    "ID3D11DepthStencilView",
    "ID3D11UnorderedAccessView",
    "ID3D11VertexShader",
    "ID3D11HullShader",
    "ID3D11DomainShader",
    "ID3D11GeometryShader",
    "ID3D11PixelShader",
    "ID3D11ComputeShader",
    "ID3D11InputLayout",
    "ID3D11SamplerState",
    "ID3D11BlendState",
    "ID3D11DepthStencilState",
    "ID3D11RasterizerState",
    "ID3D11Query",
    "ID3D11Predicate",
    "ID3D11Counter",
    "ID3D11ClassLinkage",
    "ID3D11ClassInstance",
    "ID3D11Buffer",
    "ID3D11Texture1D",
    "ID3D11Texture2D",
    "ID3D11Texture3D",
    "ID3D11CommandList",
];

/// Interfaces with their parent, parents first.
fn interfaces() -> Vec<(&'static str, Option<&'static str>, Methods)> {
    let mut list = vec![
        ("IUnknown", None, unknown_methods()),
        (
            "IDXGIObject",
            Some("IUnknown"),
            methods(&[("GetParent", D3dAction::GetParent)]),
        ),
        ("IDXGIFactory", Some("IDXGIObject"), factory_methods()),
        ("IDXGIDevice", Some("IDXGIObject"), Methods::new()),
        ("IDXGIAdapter", Some("IDXGIObject"), Methods::new()),
        ("IDXGISwapChain", Some("IDXGIObject"), swap_chain_methods()),
        ("ID3D11Device", Some("IUnknown"), device_methods()),
        ("ID3D11DeviceChild", Some("IUnknown"), Methods::new()),
        (
            "ID3D11DeviceContext",
            Some("ID3D11DeviceChild"),
            context_methods(),
        ),
    ];
    list.extend(
        PLAIN_CHILDREN
            .iter()
            .map(|&name| (name, Some("ID3D11DeviceChild"), Methods::new())),
    );
    list
}

/// Interface name without its trailing version digits (`ID3D11Device5` -> `ID3D11Device`).
pub fn base_interface(name: &str) -> &str {
    name.trim_end_matches(|c: char| c.is_ascii_digit())
}

/// Global entry points and COM interfaces, each interface flattened with its parents' methods.
#[derive(Debug, Clone)]
pub struct InterfaceTable {
    globals: HashMap<&'static str, D3dAction>,
    interfaces: HashMap<&'static str, HashMap<String, D3dAction>>,
}

impl InterfaceTable {
    /// Build the table.
    pub fn new() -> Self {
        let globals = HashMap::from([
            ("CreateDXGIFactory", D3dAction::CreateFactory),
            (
                "D3D11CreateDevice",
                D3dAction::CreateDevice {
                    device_arg: 7,
                    swap_chain: None,
                },
            ),
            (
                "D3D11CreateDeviceAndSwapChain",
                D3dAction::CreateDevice {
                    device_arg: 9,
                    swap_chain: Some((7, 8)),
                },
            ),
            ("memcpy", D3dAction::Memcpy),
        ]);

        let mut interfaces: HashMap<&'static str, HashMap<String, D3dAction>> = HashMap::new();
        for (name, parent, own) in self::interfaces() {
            let mut flat = parent
                .and_then(|p| interfaces.get(p))
                .cloned()
                .unwrap_or_default();
            flat.extend(own);
            interfaces.insert(name, flat);
        }
        Self {
            globals,
            interfaces,
        }
    }

    /// Handler of `name`, either `Interface::Method` or a global function.
    ///
    /// Trailing digits of interface names and global functions select API revisions and
    /// are ignored.
    pub fn lookup(&self, name: &str) -> Option<D3dAction> {
        match name.split_once("::") {
            Some((iface, method)) => self
                .interfaces
                .get(base_interface(iface))?
                .get(method)
                .copied(),
            None => self
                .globals
                .get(name)
                .or_else(|| self.globals.get(base_interface(name)))
                .copied(),
        }
    }

    /// Number of known interfaces.
    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }
}

impl Default for InterfaceTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/d3d11/interfaces.rs"]
mod tests;
