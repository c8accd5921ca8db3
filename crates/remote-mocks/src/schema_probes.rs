//! Introspection-only routes reporting deliberately defective remote
//! schemas, used to probe the consuming engine's schema validation: missing
//! fields, wrong argument signatures, null root types, and batched-field
//! input types that are mis-declared or missing altogether.

use axum::{extract::Request, routing::any, Json, Router};
use serde_json::Value;

use crate::{
    introspection::{FieldDef, InputFieldDef, SchemaDocument, TypeDef, TypeRef},
    verify::{ExpectedGraphqlRequest, RawRequest, VerificationError},
};

pub(crate) fn routes() -> Router {
    Router::new()
        .route("/noquery", any(no_query))
        .route("/invalidargument", any(invalid_argument))
        .route("/invalidtype", any(invalid_type))
        .route("/nullQueryAndMutationType", any(null_query_and_mutation_type))
        .route("/missingQueryAndMutationType", any(missing_query_and_mutation_type))
        .route("/invalidInputForBatchedField", any(invalid_input_for_batched_field))
        .route("/missingTypeForBatchedFieldInput", any(missing_type_for_batched_field_input))
        .route("/getPosts", any(get_posts))
}

/// Accepts nothing but introspection at `url_suffix`.
fn introspection_only(request: &RawRequest, url_suffix: &'static str) -> Result<(), VerificationError> {
    request.verify_graphql(&ExpectedGraphqlRequest { url_suffix, body: "" })?;
    Ok(())
}

/// The `getPosts` batched field, with a caller-chosen input declaration.
fn get_posts_field(input: TypeRef) -> FieldDef {
    FieldDef::new("getPosts", TypeRef::object("Post").non_null().list()).arg("input", input)
}

fn post_filter_input() -> TypeDef {
    TypeDef::input_object(
        "PostFilterInput",
        vec![
            InputFieldDef::new("id", TypeRef::scalar("ID").non_null()),
            InputFieldDef::new("text", TypeRef::scalar("String").non_null()),
        ],
    )
}

/// A schema whose query type exists but declares no fields at all.
async fn no_query(request: Request) -> Result<Json<Value>, VerificationError> {
    let request = RawRequest::read(request).await?;
    introspection_only(&request, "/noquery")?;

    Ok(Json(
        SchemaDocument::new()
            .with_query_type("Query")
            .with_type(TypeDef::object("Query", Vec::new()))
            .into_response_value(),
    ))
}

/// `country` exists but takes `no_code`, not the expected argument name.
async fn invalid_argument(request: Request) -> Result<Json<Value>, VerificationError> {
    let request = RawRequest::read(request).await?;
    introspection_only(&request, "/invalidargument")?;

    Ok(Json(
        SchemaDocument::new()
            .with_query_type("Query")
            .with_type(TypeDef::object(
                "Query",
                vec![FieldDef::new("country", TypeRef::object("Country").non_null())
                    .arg("no_code", TypeRef::scalar("ID").non_null())],
            ))
            .into_response_value(),
    ))
}

/// `country(code:)` is declared with the wrong scalar type.
async fn invalid_type(request: Request) -> Result<Json<Value>, VerificationError> {
    let request = RawRequest::read(request).await?;
    introspection_only(&request, "/invalidtype")?;

    Ok(Json(
        SchemaDocument::new()
            .with_query_type("Query")
            .with_type(TypeDef::object(
                "Query",
                vec![FieldDef::new("country", TypeRef::object("Country").non_null())
                    .arg("code", TypeRef::scalar("Int").non_null())],
            ))
            .into_response_value(),
    ))
}

async fn null_query_and_mutation_type(request: Request) -> Result<Json<Value>, VerificationError> {
    let request = RawRequest::read(request).await?;
    introspection_only(&request, "/nullQueryAndMutationType")?;

    Ok(Json(SchemaDocument::new().into_response_value()))
}

/// Root types are named but their type declarations are absent.
async fn missing_query_and_mutation_type(request: Request) -> Result<Json<Value>, VerificationError> {
    let request = RawRequest::read(request).await?;
    introspection_only(&request, "/missingQueryAndMutationType")?;

    Ok(Json(
        SchemaDocument::new()
            .with_query_type("Query")
            .with_mutation_type("Mutation")
            .into_response_value(),
    ))
}

/// The batched field takes `[Int]` where an input-object list is required.
async fn invalid_input_for_batched_field(request: Request) -> Result<Json<Value>, VerificationError> {
    let request = RawRequest::read(request).await?;
    introspection_only(&request, "/invalidInputForBatchedField")?;

    Ok(Json(
        SchemaDocument::new()
            .with_query_type("Query")
            .with_type(TypeDef::object(
                "Query",
                vec![get_posts_field(TypeRef::scalar("Int").list())],
            ))
            .into_response_value(),
    ))
}

/// The batched field references `PostFilterInput`, which is not declared
/// anywhere in the document.
async fn missing_type_for_batched_field_input(request: Request) -> Result<Json<Value>, VerificationError> {
    let request = RawRequest::read(request).await?;
    introspection_only(&request, "/missingTypeForBatchedFieldInput")?;

    Ok(Json(
        SchemaDocument::new()
            .with_query_type("Query")
            .with_type(TypeDef::object(
                "Query",
                vec![get_posts_field(TypeRef::input_object("PostFilterInput").list())],
            ))
            .into_response_value(),
    ))
}

/// The well-formed counterpart: the batched field plus its input type.
async fn get_posts(request: Request) -> Result<Json<Value>, VerificationError> {
    let request = RawRequest::read(request).await?;
    introspection_only(&request, "/getPosts")?;

    Ok(Json(
        SchemaDocument::new()
            .with_query_type("Query")
            .with_type(TypeDef::object(
                "Query",
                vec![get_posts_field(TypeRef::input_object("PostFilterInput").list())],
            ))
            .with_type(post_filter_input())
            .into_response_value(),
    ))
}
