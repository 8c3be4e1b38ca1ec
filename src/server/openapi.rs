use serde_json::{json, Value};

use crate::suggest::{MAX_RESULTS, MIN_QUERY_LENGTH};

/// Swagger UI shell; the API document is fetched from `/openapi.json`.
pub const DOCS_HTML: &str = r##"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>API de Autocomplete para Ingredientes - Swagger UI</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
<div id="swagger-ui"></div>
<script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
<script>
window.ui = SwaggerUIBundle({ url: "/openapi.json", dom_id: "#swagger-ui" });
</script>
</body>
</html>
"##;

/// OpenAPI 3.1 description of the public surface. `/health` is left out on
/// purpose.
pub fn openapi_document() -> Value {
    json!({
        "openapi": "3.1.0",
        "info": {
            "title": "API de Autocomplete para Ingredientes",
            "description": "Microsserviço para sugestão de ingredientes culinários",
            "version": "1.0.0"
        },
        "paths": {
            "/sugestoes": {
                "get": {
                    "tags": ["Autocomplete"],
                    "summary": "Obter sugestões de ingredientes",
                    "description": format!(
                        "Retorna até {MAX_RESULTS} sugestões de ingredientes com base no termo pesquisado"
                    ),
                    "operationId": "obter_sugestoes",
                    "parameters": [{
                        "name": "termo",
                        "in": "query",
                        "required": true,
                        "schema": { "type": "string", "minLength": MIN_QUERY_LENGTH, "title": "Termo" },
                        "example": "leite"
                    }],
                    "responses": {
                        "200": {
                            "description": "Successful Response",
                            "content": { "application/json": {
                                "schema": { "$ref": "#/components/schemas/SugestoesResponse" }
                            }}
                        },
                        "422": {
                            "description": "Validation Error",
                            "content": { "application/json": {
                                "schema": { "$ref": "#/components/schemas/HTTPValidationError" }
                            }}
                        },
                        "500": {
                            "description": "Internal Error",
                            "content": { "application/json": {
                                "schema": { "$ref": "#/components/schemas/HTTPError" }
                            }}
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "SugestoesResponse": {
                    "type": "object",
                    "required": ["termo", "sugestoes", "count"],
                    "properties": {
                        "termo": { "type": "string" },
                        "sugestoes": { "type": "array", "items": { "type": "string" }, "maxItems": MAX_RESULTS },
                        "count": { "type": "integer" }
                    }
                },
                "ValidationError": {
                    "type": "object",
                    "required": ["loc", "msg", "type"],
                    "properties": {
                        "loc": { "type": "array", "items": { "type": "string" } },
                        "msg": { "type": "string" },
                        "type": { "type": "string" }
                    }
                },
                "HTTPValidationError": {
                    "type": "object",
                    "properties": {
                        "detail": { "type": "array", "items": { "$ref": "#/components/schemas/ValidationError" } }
                    }
                },
                "HTTPError": {
                    "type": "object",
                    "properties": { "detail": { "type": "string" } }
                }
            }
        }
    })
}
