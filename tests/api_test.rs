use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use inventario::{
    config::{AppState, Settings},
    routes::create_router,
};

fn setup_app() -> Router {
    let state = AppState::new(&Settings::default()).unwrap();
    create_router(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_with_lang(app, method, uri, body, None).await
}

async fn send_with_lang(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    lang: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(lang) = lang {
        builder = builder.header("Accept-Language", lang);
    }
    let body = match body {
        Some(json) => Body::from(json.to_string()),
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn acme() -> Value {
    json!({
        "nome": "Acme",
        "cnpj": "12345678901234",
        "contato": "x",
        "endereco": "y"
    })
}

#[tokio::test]
async fn health_check_responds() {
    let app = setup_app();
    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn supplier_with_duplicate_cnpj_is_rejected() {
    let app = setup_app();

    let (status, created) = send(&app, "POST", "/fornecedor", Some(acme())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["nome"], "Acme");
    assert!(created["id"].as_i64().unwrap() > 0);

    let (status, body) = send(&app, "POST", "/fornecedor", Some(acme())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "CNPJ já cadastrado.");

    let (status, list) = send(&app, "GET", "/fornecedores", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn supplier_validation_is_localised() {
    let app = setup_app();
    let invalid = json!({ "nome": "Acme", "cnpj": "123", "contato": "x" });

    let (status, body) =
        send_with_lang(&app, "POST", "/fornecedor", Some(invalid), Some("en-US,en;q=0.9")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "One or more fields are invalid.");
    assert_eq!(
        body["details"]["cnpj"][0],
        "The CNPJ must contain exactly 14 digits."
    );
}

#[tokio::test]
async fn supplier_update_and_delete_unlinks_products() {
    let app = setup_app();
    let (_, supplier) = send(&app, "POST", "/fornecedor", Some(acme())).await;
    let supplier_id = supplier["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/produto",
        Some(json!({
            "nome": "Caneta",
            "categoria": "Papelaria",
            "preco": 2.5,
            "estoque": 10,
            "fornecedorId": supplier_id,
            "imagem": "https://exemplo.com/caneta.png"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let mut renamed = acme();
    renamed["nome"] = json!("Acme Ltda");
    let (status, updated) =
        send(&app, "PUT", &format!("/fornecedor/{supplier_id}"), Some(renamed)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["nome"], "Acme Ltda");

    let (_, products) = send(&app, "GET", "/produtos", None).await;
    assert_eq!(products[0]["fornecedor"], "Acme Ltda");

    let (status, _) = send(&app, "DELETE", &format!("/fornecedor/{supplier_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, products) = send(&app, "GET", "/produtos", None).await;
    assert!(products[0]["fornecedorId"].is_null());
    assert!(products[0]["fornecedor"].is_null());

    let (status, _) = send(&app, "DELETE", &format!("/fornecedor/{supplier_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn placing_an_order_moves_stock_and_records_the_saida() {
    let app = setup_app();

    let (status, product) = send(
        &app,
        "POST",
        "/produto",
        Some(json!({
            "nome": "Caderno",
            "categoria": "Papelaria",
            "preco": 10,
            "estoque": 5,
            "imagem": "https://exemplo.com/caderno.png"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let product_id = product["id"].as_i64().unwrap();

    let (_, client) = send(
        &app,
        "POST",
        "/cliente",
        Some(json!({ "nome": "Maria", "cpfCnpj": "111", "contato": "m@x.com" })),
    )
    .await;
    let client_id = client["id"].as_i64().unwrap();

    let (status, order) = send(
        &app,
        "POST",
        "/pedido",
        Some(json!({
            "clienteId": client_id,
            "itens": [{ "produtoId": product_id, "quantidade": 2 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["total"].as_f64(), Some(20.0));
    assert_eq!(order["itens"][0]["preco"].as_f64(), Some(10.0));
    let order_id = order["id"].as_i64().unwrap();

    let (_, products) = send(&app, "GET", "/produtos", None).await;
    assert_eq!(products[0]["estoque"], 3);

    let (_, history) = send(&app, "GET", "/transacoes?tipo=saida", None).await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["quantidade"], 2);
    assert_eq!(history[0]["valorTotal"].as_f64(), Some(20.0));
    assert_eq!(history[0]["pedidoId"], order_id);
    assert_eq!(history[0]["produto"], "Caderno");
    assert_eq!(history[0]["origem"], format!("Pedido #{order_id}"));

    let (_, orders) = send(&app, "GET", "/pedidos?busca=mar", None).await;
    assert_eq!(orders[0]["cliente"], "Maria");

    // Pedido com transações não pode ser excluído
    let (status, _) = send(&app, "DELETE", &format!("/pedido/{order_id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn order_beyond_stock_is_rejected_without_side_effects() {
    let app = setup_app();
    let (_, product) = send(
        &app,
        "POST",
        "/produto",
        Some(json!({
            "nome": "Borracha",
            "categoria": "Papelaria",
            "preco": 1,
            "estoque": 1,
            "imagem": "https://exemplo.com/b.png"
        })),
    )
    .await;
    let (_, client) = send(
        &app,
        "POST",
        "/cliente",
        Some(json!({ "nome": "João", "cpfCnpj": "222", "contato": "c@x.com" })),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/pedido",
        Some(json!({
            "clienteId": client["id"],
            "itens": [{ "produtoId": product["id"], "quantidade": 3 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["message"].as_str().unwrap().contains("disponível 1"));

    let (_, orders) = send(&app, "GET", "/pedidos", None).await;
    assert!(orders.as_array().unwrap().is_empty());
    let (_, transactions) = send(&app, "GET", "/transacoes", None).await;
    assert!(transactions.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn order_without_client_fails_validation() {
    let app = setup_app();
    let (status, body) = send(&app, "POST", "/pedido", Some(json!({ "itens": [] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Um ou mais campos são inválidos.");
    assert!(body["details"].is_object());
}

#[tokio::test]
async fn status_transitions_follow_the_state_machine() {
    let app = setup_app();
    let (_, client) = send(
        &app,
        "POST",
        "/cliente",
        Some(json!({ "nome": "Ana", "cpfCnpj": "333", "contato": "c@x.com" })),
    )
    .await;
    let (_, order) = send(
        &app,
        "POST",
        "/pedido",
        Some(json!({ "clienteId": client["id"], "itens": [] })),
    )
    .await;
    let order_id = order["id"].as_i64().unwrap();

    let uri = format!("/pedido/{order_id}/status");
    let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "status": "completed" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");

    let (status, _) = send(&app, "PATCH", &uri, Some(json!({ "status": "pending" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, completed) = send(&app, "GET", "/pedidos?status=completed", None).await;
    assert_eq!(completed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn client_with_an_order_is_deactivated_instead_of_deleted() {
    let app = setup_app();
    let (_, client) = send(
        &app,
        "POST",
        "/cliente",
        Some(json!({ "nome": "Maria", "cpfCnpj": "111", "contato": "c@x.com" })),
    )
    .await;
    let client_id = client["id"].as_i64().unwrap();
    send(
        &app,
        "POST",
        "/pedido",
        Some(json!({ "clienteId": client_id, "itens": [] })),
    )
    .await;

    let (status, body) = send(&app, "DELETE", &format!("/cliente/{client_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resultado"], "deactivated");

    let (_, clients) = send(&app, "GET", "/clientes", None).await;
    let clients = clients.as_array().unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0]["ativo"], false);

    let (_, active) = send(&app, "GET", "/clientes?ativo=true", None).await;
    assert!(active.as_array().unwrap().is_empty());

    let (_, history) = send(&app, "GET", &format!("/clientes/{client_id}/pedidos"), None).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_filters_are_rejected() {
    let app = setup_app();

    let (status, body) = send(&app, "GET", "/pedidos?status=perdido", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Filtro inválido: perdido.");

    let (status, _) = send(&app, "GET", "/produtos?ordenarPor=peso", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/transacoes?tipo=all", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn stock_report_carries_total_value() {
    let app = setup_app();
    for (name, price, stock) in [("Lápis", 1.5, 10), ("Régua", 4.0, 2)] {
        send(
            &app,
            "POST",
            "/produto",
            Some(json!({
                "nome": name,
                "categoria": "Papelaria",
                "preco": price,
                "estoque": stock,
                "imagem": "https://exemplo.com/p.png"
            })),
        )
        .await;
    }

    let (status, report) = send(&app, "GET", "/estoque?ordenarPor=total&direcao=desc", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report[0]["nome"], "Lápis");
    assert_eq!(report[0]["valorTotal"].as_f64(), Some(15.0));
    assert_eq!(report[1]["valorTotal"].as_f64(), Some(8.0));
}

fn caneta() -> Value {
    json!({
        "nome": "Caneta",
        "categoria": "Papelaria",
        "preco": 2.5,
        "estoque": 10,
        "imagem": "https://exemplo.com/caneta.png"
    })
}

#[tokio::test]
async fn product_validation_reports_each_field() {
    let app = setup_app();
    let cases = [
        ("imagem", json!("nao-e-url"), "A URL da imagem é inválida."),
        ("estoque", json!(0), "O estoque deve ser um número inteiro entre 1 e 1000000000."),
        ("preco", json!(0), "O preço deve ser maior que 0."),
        ("nome", json!("   "), "O campo não pode ficar em branco."),
    ];

    for (field, value, message) in cases {
        let mut payload = caneta();
        payload[field] = value;
        let (status, body) = send(&app, "POST", "/produto", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "campo {field}");
        assert_eq!(body["message"], "Um ou mais campos são inválidos.");
        assert_eq!(body["details"][field][0], message, "campo {field}");
        assert_eq!(body["details"].as_object().unwrap().len(), 1);
    }

    let (_, products) = send(&app, "GET", "/produtos", None).await;
    assert!(products.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn fractional_stock_is_a_bad_request() {
    let app = setup_app();
    let mut payload = caneta();
    payload["estoque"] = json!(2.5);

    let (status, body) = send(&app, "POST", "/produto", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Corpo da requisição inválido"));
}

#[tokio::test]
async fn huge_prices_and_quantities_are_rejected_before_any_arithmetic() {
    let app = setup_app();
    let mut payload = caneta();
    payload["preco"] = json!(1e20);

    let (status, body) = send(&app, "POST", "/produto", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["preco"][0], "O preço não pode passar de 1000000000.");

    let mut payload = caneta();
    payload["estoque"] = json!(i64::MAX);
    let (status, body) = send(&app, "POST", "/produto", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["estoque"].is_array());

    let (status, product) = send(&app, "POST", "/produto", Some(caneta())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, client) = send(
        &app,
        "POST",
        "/cliente",
        Some(json!({ "nome": "Bia", "cpfCnpj": "444", "contato": "b@x.com" })),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/pedido",
        Some(json!({
            "clienteId": client["id"],
            "itens": [{ "produtoId": product["id"], "quantidade": i64::MAX }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["details"]["itens[0].quantidade"][0],
        "A quantidade deve ser um número inteiro entre 1 e 1000000000."
    );

    let (status, report) = send(&app, "GET", "/estoque", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report[0]["valorTotal"].as_f64(), Some(25.0));
}

#[tokio::test]
async fn client_requires_a_contact() {
    let app = setup_app();

    let (status, body) = send(
        &app,
        "POST",
        "/cliente",
        Some(json!({ "nome": "Caio", "cpfCnpj": "555", "contato": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["contato"][0], "O campo não pode ficar em branco.");

    let (status, body) = send(
        &app,
        "POST",
        "/cliente",
        Some(json!({ "nome": "Caio", "cpfCnpj": "", "contato": "c@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["cpfCnpj"].is_array());

    let (status, body) = send(
        &app,
        "POST",
        "/cliente",
        Some(json!({ "nome": "Caio", "cpfCnpj": "555" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("contato"));

    let (_, clients) = send(&app, "GET", "/clientes", None).await;
    assert!(clients.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn client_orders_reject_unknown_query_values() {
    let app = setup_app();
    let (_, client) = send(
        &app,
        "POST",
        "/cliente",
        Some(json!({ "nome": "Lia", "cpfCnpj": "666", "contato": "l@x.com" })),
    )
    .await;
    let client_id = client["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "GET",
        &format!("/clientes/{client_id}/pedidos?status=perdido"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Filtro inválido: perdido.");

    let (status, _) = send(
        &app,
        "GET",
        &format!("/clientes/{client_id}/pedidos?status=pending&status=all"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
