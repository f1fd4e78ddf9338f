//! Print the aggregated OpenAPI document to stdout for frontend codegen.

use scoreline_back::services::documentation::ApiDoc;
use utoipa::OpenApi;

fn main() {
    let doc = ApiDoc::openapi();
    println!("{}", doc.to_pretty_json().unwrap());
}
