use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Attribute, Data, DeriveInput, Error, Field, Fields, Ident, LitInt, Result, Type,
    spanned::Spanned,
};

pub(crate) fn expand_from_bits(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new(
            input.span(),
            "`FromBits` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new(
            input.span(),
            "`FromBits` may only be derived on structs with named fields.",
        ))?
    };

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .collect::<Result<Vec<_>>>()?;

    // Fields are read in declaration order, which must match the wire order.
    let reads = fields.iter().map(FieldMetadata::read);
    let names = fields.iter().map(|f| &f.name);

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics FromBits for #name #ty_generics #where_clause {
            fn from_bits(cursor: &mut BitCursor<'_>) -> Result<Self, DecodeError> {
                #(#reads)*
                Ok(Self { #(#names),* })
            }
        }
    };

    Ok(expanded.into())
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    ty: Type,
    reserved: Option<LitInt>,
    layout: Layout,
}

#[derive(Debug)]
enum Layout {
    /// An unsigned integer (or `bool`, for a single bit) of a fixed width.
    Bits(LitInt),
    /// A fixed number of whole bytes.
    Bytes(LitInt),
    /// A one-byte length followed by that many bytes.
    Text,
    /// Every byte left in scope.
    Rest,
    /// Another `FromBits` implementation.
    Nested,
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Self> {
        let name = field.ident.clone().unwrap();

        let reserved = field
            .attrs
            .iter()
            .find(|a| a.path().is_ident("reserved"))
            .map(|a| a.parse_args::<LitInt>())
            .transpose()?;

        let mut layouts = field.attrs.iter().filter_map(|a| Layout::parse(a).transpose());

        let Some(layout) = layouts.next().transpose()? else {
            Err(Error::new_spanned(
                field,
                "Field must have one of the `bits`, `bytes`, `text`, `rest` or `nested` attributes.",
            ))?
        };

        if layouts.next().is_some() {
            Err(Error::new_spanned(
                field,
                "Field must have exactly one layout attribute.",
            ))?
        }

        if let Layout::Bits(width) = &layout {
            let bits = width.base10_parse::<u32>()?;

            if bits == 0 || bits > 32 {
                Err(Error::new_spanned(
                    width,
                    "Field width must be between 1 and 32 bits.",
                ))?
            }

            if is_bool(&field.ty) && bits != 1 {
                Err(Error::new_spanned(
                    width,
                    "A `bool` field must be exactly one bit wide.",
                ))?
            }

            if let Some(capacity) = primitive_width(&field.ty).filter(|&c| bits > c) {
                Err(Error::new_spanned(
                    width,
                    format!("Field width of {bits} bits does not fit in a {capacity}-bit integer."),
                ))?
            }
        }

        Ok(Self {
            name,
            ty: field.ty.clone(),
            reserved,
            layout,
        })
    }

    fn read(&self) -> TokenStream2 {
        let Self {
            name,
            ty,
            reserved,
            layout,
        } = self;

        let skip = reserved.as_ref().map(|bits| {
            quote! { cursor.skip_bits(#bits)?; }
        });

        let value = match layout {
            Layout::Bits(_) if is_bool(ty) => quote! { cursor.read_flag()? },
            Layout::Bits(width) => quote! { cursor.read_bits(#width)? as #ty },
            Layout::Bytes(count) => quote! { cursor.read_array::<#count>()?.into() },
            Layout::Text => quote! { cursor.read_length_prefixed_text()?.into() },
            Layout::Rest => quote! { cursor.read_remaining()?.into() },
            Layout::Nested => quote! { <#ty as FromBits>::from_bits(cursor)? },
        };

        quote! {
            #skip
            let #name: #ty = #value;
        }
    }
}

impl Layout {
    fn parse(attr: &Attribute) -> Result<Option<Self>> {
        let path = attr.path();

        let layout = if path.is_ident("bits") {
            Self::Bits(attr.parse_args()?)
        } else if path.is_ident("bytes") {
            Self::Bytes(attr.parse_args()?)
        } else if path.is_ident("text") {
            attr.meta.require_path_only()?;
            Self::Text
        } else if path.is_ident("rest") {
            attr.meta.require_path_only()?;
            Self::Rest
        } else if path.is_ident("nested") {
            attr.meta.require_path_only()?;
            Self::Nested
        } else {
            return Ok(None);
        };

        Ok(Some(layout))
    }
}

fn is_bool(ty: &Type) -> bool {
    matches!(ty, Type::Path(path) if path.path.is_ident("bool"))
}

fn primitive_width(ty: &Type) -> Option<u32> {
    let Type::Path(path) = ty else {
        return None;
    };

    let ident = path.path.get_ident()?;
    if ident == "u8" {
        Some(u8::BITS)
    } else if ident == "u16" {
        Some(u16::BITS)
    } else if ident == "u32" {
        Some(u32::BITS)
    } else {
        None
    }
}
