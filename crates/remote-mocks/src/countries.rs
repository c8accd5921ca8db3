//! The GraphQL country service: query and mutation routes with exact
//! expected bodies, plus the deliberate failure modes (a pure error response
//! and a partial success carrying both `data` and `errors`).

use axum::{extract::Request, routing::any, Json, Router};
use serde_json::{json, Value};

use crate::{
    introspection::{FieldDef, SchemaDocument, TypeDef, TypeRef},
    verify::{ExpectedGraphqlRequest, RawRequest, VerificationError},
};

const COUNTRY_QUERY: &str =
    r#"{"query":"query { country(code: $id) {\ncode\nname\n}}","variables":{"id":"BI"}}"#;

const SET_COUNTRY_MUTATION: &str = r#"{"query":"mutation { setCountry(country: $input) {\ncode\nname\nstates{\ncode\nname\n}\n}}","variables":{"input":{"code":"IN","name":"India","states":[{"code":"RJ","name":"Rajasthan"},{"code":"KA","name":"Karnataka"}]}}}"#;

const UPDATE_COUNTRIES_MUTATION: &str = r#"{"query":"mutation { updateCountries(name: $name, std: $std) {\nname\nstd\n}}","variables":{"name":"Australia","std":91}}"#;

pub(crate) fn routes() -> Router {
    Router::new()
        // queries
        .route("/validcountry", any(valid_country))
        .route("/validcountrywitherror", any(valid_country_with_error))
        .route("/graphqlerr", any(graphql_err))
        .route("/validcountries", any(valid_countries))
        // mutations
        .route("/setCountry", any(set_country))
        .route("/updateCountries", any(update_countries))
}

/// `country(code: ID!)` with a caller-chosen result wrapper; the wrapper is
/// what distinguishes the to-one routes from the to-many ones.
fn country_schema(result: TypeRef) -> Value {
    SchemaDocument::new()
        .with_query_type("Query")
        .with_type(TypeDef::object(
            "Query",
            vec![FieldDef::new("country", result).arg("code", TypeRef::scalar("ID").non_null())],
        ))
        .into_response_value()
}

async fn valid_country(request: Request) -> Result<Json<Value>, VerificationError> {
    let request = RawRequest::read(request).await?;
    let is_introspection = request.verify_graphql(&ExpectedGraphqlRequest {
        url_suffix: "/validcountry",
        body: COUNTRY_QUERY,
    })?;

    if is_introspection {
        return Ok(Json(country_schema(TypeRef::object("Country").non_null())));
    }

    Ok(Json(json!({
        "data": { "country": { "name": "Burundi", "code": "BI" } }
    })))
}

/// Partial success: a well-formed `country` payload and a sibling `errors`
/// array in the same response.
async fn valid_country_with_error(request: Request) -> Result<Json<Value>, VerificationError> {
    let request = RawRequest::read(request).await?;
    let is_introspection = request.verify_graphql(&ExpectedGraphqlRequest {
        url_suffix: "/validcountrywitherror",
        body: COUNTRY_QUERY,
    })?;

    if is_introspection {
        return Ok(Json(country_schema(TypeRef::object("Country").non_null())));
    }

    Ok(Json(json!({
        "data": { "country": { "name": "Burundi", "code": "BI" } },
        "errors": [{ "message": "dummy error" }]
    })))
}

/// Pure error: a top-level `errors` array and no `data` key at all.
async fn graphql_err(request: Request) -> Result<Json<Value>, VerificationError> {
    let request = RawRequest::read(request).await?;
    let is_introspection = request.verify_graphql(&ExpectedGraphqlRequest {
        url_suffix: "/graphqlerr",
        body: COUNTRY_QUERY,
    })?;

    if is_introspection {
        return Ok(Json(country_schema(TypeRef::object("Country").list())));
    }

    Ok(Json(json!({
        "errors": [{ "message": "dummy error" }]
    })))
}

async fn valid_countries(request: Request) -> Result<Json<Value>, VerificationError> {
    let request = RawRequest::read(request).await?;
    let is_introspection = request.verify_graphql(&ExpectedGraphqlRequest {
        url_suffix: "/validcountries",
        body: COUNTRY_QUERY,
    })?;

    if is_introspection {
        return Ok(Json(country_schema(TypeRef::object("Country").list())));
    }

    Ok(Json(json!({
        "data": { "country": [{ "name": "Burundi", "code": "BI" }] }
    })))
}

async fn set_country(request: Request) -> Result<Json<Value>, VerificationError> {
    let request = RawRequest::read(request).await?;
    let is_introspection = request.verify_graphql(&ExpectedGraphqlRequest {
        url_suffix: "/setCountry",
        body: SET_COUNTRY_MUTATION,
    })?;

    if is_introspection {
        // The argument is reported with kind OBJECT, not INPUT_OBJECT: the
        // defect is part of the fixture.
        return Ok(Json(
            SchemaDocument::new()
                .with_mutation_type("MyMutations")
                .with_type(TypeDef::object(
                    "MyMutations",
                    vec![FieldDef::new("setCountry", TypeRef::object("Country").non_null())
                        .arg("country", TypeRef::object("CountryInput").non_null())],
                ))
                .into_response_value(),
        ));
    }

    Ok(Json(json!({
        "data": {
            "setCountry": {
                "code": "IN",
                "name": "India",
                "states": [
                    { "code": "RJ", "name": "Rajasthan" },
                    { "code": "KA", "name": "Karnataka" }
                ]
            }
        }
    })))
}

async fn update_countries(request: Request) -> Result<Json<Value>, VerificationError> {
    let request = RawRequest::read(request).await?;
    let is_introspection = request.verify_graphql(&ExpectedGraphqlRequest {
        url_suffix: "/updateCountries",
        body: UPDATE_COUNTRIES_MUTATION,
    })?;

    if is_introspection {
        return Ok(Json(
            SchemaDocument::new()
                .with_mutation_type("Mutation")
                .with_type(TypeDef::object(
                    "Mutation",
                    vec![FieldDef::new(
                        "updateCountries",
                        TypeRef::object("Country").non_null().list().non_null(),
                    )
                    .arg("name", TypeRef::scalar("String"))
                    .arg("std", TypeRef::scalar("Int"))],
                ))
                .into_response_value(),
        ));
    }

    Ok(Json(json!({
        "data": {
            "updateCountries": [
                { "name": "India", "std": 91 },
                { "name": "Australia", "std": 61 }
            ]
        }
    })))
}
