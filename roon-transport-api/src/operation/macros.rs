//! Declarative macro for transport operation definitions

/// Define a transport operation with minimal boilerplate
///
/// Generates `<Operation>Request` with the listed fields (serialized as the
/// request body, field attributes pass through to serde), the unit struct
/// `<Operation>` and its [`TransportOperation`](crate::operation::TransportOperation)
/// impl. `response: ()` ignores the reply body; any other response type is
/// decoded from it. A `Validate` impl for the request must be written by hand.
///
/// # Example
/// ```rust,ignore
/// define_transport_operation! {
///     operation: MuteOperation,
///     method: "mute",
///     request: {
///         output_id: String,
///         how: MuteHow,
///     },
///     response: (),
/// }
///
/// impl Validate for MuteOperationRequest {}
/// ```
#[macro_export]
macro_rules! define_transport_operation {
    (
        operation: $op_struct:ident,
        method: $method:literal,
        request: {
            $($(#[$field_meta:meta])* $field:ident: $field_type:ty),* $(,)?
        },
        response: (),
    ) => {
        $crate::define_transport_operation! {
            @define $op_struct, $method,
            { $($(#[$field_meta])* $field: $field_type),* },
            (),
            |_body| Ok(())
        }
    };

    (
        operation: $op_struct:ident,
        method: $method:literal,
        request: {
            $($(#[$field_meta:meta])* $field:ident: $field_type:ty),* $(,)?
        },
        response: $response_type:ty,
    ) => {
        $crate::define_transport_operation! {
            @define $op_struct, $method,
            { $($(#[$field_meta])* $field: $field_type),* },
            $response_type,
            |body| $crate::operation::decode_body(body)
        }
    };

    (
        @define $op_struct:ident, $method:literal,
        { $($(#[$field_meta:meta])* $field:ident: $field_type:ty),* },
        $response_type:ty,
        |$body:ident| $parse_expr:expr
    ) => {
        paste::paste! {
            #[derive(serde::Serialize, Clone, Debug, PartialEq)]
            pub struct [<$op_struct Request>] {
                $($(#[$field_meta])* pub $field: $field_type,)*
            }

            #[derive(Debug, Clone, Copy)]
            pub struct $op_struct;

            impl $crate::operation::TransportOperation for $op_struct {
                type Request = [<$op_struct Request>];
                type Response = $response_type;

                const METHOD: &'static str = $method;

                fn parse_response(
                    body: Option<serde_json::Value>,
                ) -> Result<Self::Response, $crate::error::ApiError> {
                    let $body = body;
                    $parse_expr
                }
            }
        }
    };
}
