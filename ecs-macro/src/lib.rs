use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Type, parse_macro_input};

/// Derive the `Component` trait, providing the component name and field
/// reflection used by the world registry and diagnostics.
///
/// # Named structs
///
/// ```ignore
/// #[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Component)]
/// #[repr(C)]
/// struct Destination {
///     width: u32,
///     height: u32,
/// }
/// ```
///
/// # Tuple structs
///
/// ```ignore
/// #[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Component)]
/// #[repr(C)]
/// struct GlobalTransform(pub Mat4);
/// ```
#[proc_macro_derive(Component)]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let name_str = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let field_infos = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => {
                // Skip fields starting with `_` (padding fields for Pod alignment)
                let infos = fields
                    .named
                    .iter()
                    .filter_map(|f| f.ident.as_ref().map(|id| (id, &f.ty)))
                    .filter(|(id, _)| !id.to_string().starts_with('_'))
                    .map(|(id, ftype)| field_info(&id.to_string(), ftype));
                quote! { &[#(#infos),*] }
            }
            Fields::Unnamed(fields) => {
                let infos = fields
                    .unnamed
                    .iter()
                    .enumerate()
                    .map(|(i, f)| field_info(&i.to_string(), &f.ty));
                quote! { &[#(#infos),*] }
            }
            Fields::Unit => quote! { &[] },
        },
        _ => {
            return syn::Error::new_spanned(
                &input.ident,
                "Component can only be derived for structs",
            )
            .to_compile_error()
            .into();
        }
    };

    let expanded = quote! {
        impl #impl_generics vantage_ecs::Component for #name #ty_generics #where_clause {
            const NAME: &'static str = #name_str;
            const FIELDS: &'static [vantage_ecs::FieldInfo] = #field_infos;
        }
    };

    expanded.into()
}

fn field_info(name: &str, ty: &Type) -> proc_macro2::TokenStream {
    let kind = infer_field_kind(ty);
    quote! {
        vantage_ecs::FieldInfo {
            name: #name,
            kind: #kind,
        }
    }
}

/// Infer `FieldKind` from a type by matching the last path segment.
fn infer_field_kind(ty: &Type) -> proc_macro2::TokenStream {
    let type_name = extract_last_segment(ty);
    match type_name.as_str() {
        "f32" => quote! { vantage_ecs::FieldKind::F32 },
        "u32" => quote! { vantage_ecs::FieldKind::U32 },
        "bool" => quote! { vantage_ecs::FieldKind::Bool },
        "Vec3" | "Vec3A" => quote! { vantage_ecs::FieldKind::Vec3 },
        "Quat" => quote! { vantage_ecs::FieldKind::Quat },
        "Mat4" => quote! { vantage_ecs::FieldKind::Mat4 },
        "RefSlot" => quote! { vantage_ecs::FieldKind::RefSlot },
        _ => {
            let msg = format!(
                "Component derive: unknown field type `{}`. Expected one of: f32, u32, bool, Vec3, Quat, Mat4, RefSlot.",
                type_name
            );
            quote! { compile_error!(#msg) }
        }
    }
}

/// Extract the last segment name from a type path (e.g. `glam::Vec3` → `"Vec3"`).
fn extract_last_segment(ty: &Type) -> String {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}
