use super::*;

#[test]
fn methods_resolve_through_the_parent_chain() {
    let table = InterfaceTable::new();
    assert_eq!(
        table.lookup("IDXGISwapChain::Release"),
        Some(D3dAction::Release)
    );
    assert_eq!(
        table.lookup("IDXGISwapChain::GetParent"),
        Some(D3dAction::GetParent)
    );
    assert_eq!(
        table.lookup("ID3D11DeviceContext::AddRef"),
        Some(D3dAction::AddRef)
    );
    assert_eq!(table.lookup("ID3D11Device::GetParent"), None);
}

#[test]
fn interface_revisions_share_the_base_table() {
    let table = InterfaceTable::new();
    assert_eq!(base_interface("ID3D11DeviceContext4"), "ID3D11DeviceContext");
    assert_eq!(base_interface("ID3D11Texture2D1"), "ID3D11Texture2D");
    assert_eq!(
        table.lookup("ID3D11DeviceContext1::Draw"),
        Some(D3dAction::Draw { indirect: false })
    );
    assert_eq!(
        table.lookup("IDXGIFactory2::CreateSwapChainForHwnd"),
        Some(D3dAction::CreateSwapChain {
            desc_arg: 3,
            out_arg: 6,
            nested: false,
        })
    );
    assert_eq!(
        table.lookup("ID3D11Texture2D::Release"),
        Some(D3dAction::Release)
    );
}

#[test]
fn globals_ignore_revision_digits() {
    let table = InterfaceTable::new();
    assert_eq!(table.lookup("CreateDXGIFactory1"), Some(D3dAction::CreateFactory));
    assert_eq!(
        table.lookup("D3D11CreateDeviceAndSwapChain"),
        Some(D3dAction::CreateDevice {
            device_arg: 9,
            swap_chain: Some((7, 8)),
        })
    );
    assert_eq!(table.lookup("memcpy"), Some(D3dAction::Memcpy));
    assert_eq!(table.lookup("glDrawArrays"), None);
}

#[test]
fn per_stage_entry_points_are_generated() {
    let table = InterfaceTable::new();
    assert_eq!(
        table.lookup("ID3D11DeviceContext::CSSetShader"),
        Some(D3dAction::SetShader(Stage::Compute))
    );
    assert_eq!(
        table.lookup("ID3D11DeviceContext::PSSetShaderResources"),
        Some(D3dAction::BindSlots {
            kind: BindingKind::ShaderResources,
            stage: Stage::Pixel,
        })
    );
    assert_eq!(
        table.lookup("ID3D11DeviceContext::HSSetConstantBuffers"),
        Some(D3dAction::BindSlots {
            kind: BindingKind::ConstantBuffers,
            stage: Stage::Hull,
        })
    );
    assert_eq!(table.lookup("ID3D11UnknownThing::Release"), None);
    assert!(table.interface_count() > 30);
}
