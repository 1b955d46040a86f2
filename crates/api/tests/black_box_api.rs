use reqwest::StatusCode;
use serde_json::{Value, json};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod) with the in-memory store, bound
        // to an ephemeral port.
        let app = houndwear_api::app::build_app().await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn submission(name: &str, category: &str, stocks: [i64; 5]) -> Value {
    let sizes: Vec<Value> = ["XS", "S", "M", "L", "XL"]
        .iter()
        .zip(stocks)
        .map(|(size, stock)| json!({ "size": size, "stock": stock }))
        .collect();
    json!({
        "name": name,
        "price_cents": 3900,
        "discount_percent": 0,
        "category": category,
        "description": "",
        "images": ["https://img.example/front.jpg"],
        "active": true,
        "sizes": sizes,
    })
}

async fn create_product(client: &reqwest::Client, base_url: &str, body: &Value) -> i64 {
    let res = client
        .post(format!("{base_url}/admin/products"))
        .json(body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    body["product"]["id"].as_i64().expect("product id")
}

fn item_names(page: &Value) -> Vec<String> {
    page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_is_ok() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn size_filter_matches_only_in_stock_rows() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    // A carries M, B carries L; A's S row exists but is sold out.
    create_product(&client, base, &submission("Rain Jacket", "Jackets", [0, 0, 3, 0, 0])).await;
    create_product(&client, base, &submission("Mud Boots", "Boots", [0, 0, 0, 2, 0])).await;

    let page: Value = client
        .get(format!("{base}/shop?size=M"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(item_names(&page), vec!["Rain Jacket"]);

    let page: Value = client
        .get(format!("{base}/shop?size=L"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(item_names(&page), vec!["Mud Boots"]);

    // The zero-stock S row does not satisfy a concrete size filter.
    let page: Value = client
        .get(format!("{base}/shop?size=S"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(item_names(&page).is_empty());

    // No filters: everything, and the applied defaults echoed back.
    let page: Value = client
        .get(format!("{base}/shop"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(item_names(&page), vec!["Rain Jacket", "Mud Boots"]);
    assert_eq!(page["params"]["category"], "All");
    assert_eq!(page["params"]["size"], "All");
}

#[tokio::test]
async fn facets_reflect_live_stock() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    create_product(&client, base, &submission("Rain Jacket", "Jackets", [0, 0, 3, 0, 0])).await;
    create_product(&client, base, &submission("Mud Boots", "Boots", [0, 0, 0, 2, 0])).await;

    let facets: Value = client
        .get(format!("{base}/shop/facets"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        facets["categories"],
        json!(["All", "Jackets", "Boots"]),
        "categories lead with the sentinel, first-appearance order"
    );
    // Every XL row is at zero, so XL is absent.
    assert_eq!(facets["sizes"], json!(["All", "M", "L"]));
}

#[tokio::test]
async fn detail_and_bounds_read_fresh_stock() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    let id = create_product(&client, base, &submission("Rain Jacket", "Jackets", [0, 0, 3, 0, 0]))
        .await;

    let detail: Value = client
        .get(format!("{base}/products/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["in_stock_sizes"], json!(["M"]));
    assert_eq!(detail["default_size"], "M");

    let bounds: Value = client
        .get(format!("{base}/products/{id}/bounds?size=M"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(bounds["min"], 1);
    assert_eq!(bounds["max"], 3);
    assert_eq!(bounds["in_stock"], true);

    // Sold-out size: degenerate range, purchase blocked.
    let bounds: Value = client
        .get(format!("{base}/products/{id}/bounds?size=XS"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(bounds["max"], 0);
    assert_eq!(bounds["in_stock"], false);

    let res = client
        .get(format!("{base}/products/999"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{base}/products/not-a-number"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reconcile_is_idempotent() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    let body = submission("Rain Jacket", "Jackets", [1, 2, 3, 4, 5]);
    let id = create_product(&client, base, &body).await;

    let res = client
        .put(format!("{base}/admin/products/{id}"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let report: Value = res.json().await.unwrap();
    let writes = report["report"]["writes"].as_array().unwrap();
    assert_eq!(writes.len(), 5);
    for write in writes {
        assert_eq!(write["outcome"], "unchanged", "second pass must not rewrite");
    }
}

#[tokio::test]
async fn validation_rejects_before_any_write() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    let mut bad = submission("Rain Jacket", "Jackets", [0, 0, 3, 0, 0]);
    bad["discount_percent"] = json!(150);
    let res = client
        .post(format!("{base}/admin/products"))
        .json(&bad)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["field"], "discount_percent");

    let mut bad = submission("Rain Jacket", "Jackets", [0, 0, 0, 0, 0]);
    bad["sizes"][2]["stock"] = json!(-1);
    let res = client
        .post(format!("{base}/admin/products"))
        .json(&bad)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["field"], "stock.M");

    let mut bad = submission("Rain Jacket", "Jackets", [0, 0, 0, 0, 0]);
    bad["sizes"].as_array_mut().unwrap().pop();
    let res = client
        .post(format!("{base}/admin/products"))
        .json(&bad)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["field"], "sizes");

    // Nothing landed.
    let table: Value = client
        .get(format!("{base}/admin/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(table["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn best_seller_toggle_enforces_capacity() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    let mut ids = Vec::new();
    for n in 0..6 {
        let body = submission(&format!("Sweater {n}"), "Sweaters", [1, 1, 1, 1, 1]);
        ids.push(create_product(&client, base, &body).await);
    }

    for id in &ids[..5] {
        let res = client
            .post(format!("{base}/admin/products/{id}/best"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["featured"], true);
    }

    // The sixth is over capacity.
    let res = client
        .post(format!("{}/admin/products/{}/best", base, ids[5]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invariant_violation");

    // Toggling a member off frees a slot.
    let res = client
        .post(format!("{}/admin/products/{}/best", base, ids[0]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["featured"], false);

    let res = client
        .post(format!("{}/admin/products/{}/best", base, ids[5]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let members: Value = client
        .get(format!("{base}/admin/best-sellers"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(members["ids"], json!([ids[1], ids[2], ids[3], ids[4], ids[5]]));

    let res = client
        .post(format!("{base}/admin/products/999/best"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_table_carries_stock_and_pricing() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    let mut body = submission("Rain Jacket", "Jackets", [1, 2, 3, 0, 0]);
    body["discount_percent"] = json!(10);
    let id = create_product(&client, base, &body).await;

    let table: Value = client
        .get(format!("{base}/admin/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let items = table["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    let row = &items[0];
    assert_eq!(row["product"]["id"].as_i64().unwrap(), id);
    assert_eq!(row["total_stock"], 6);
    assert_eq!(row["discounted_price_cents"], 3510);
    assert_eq!(row["best_seller"], false);
    assert_eq!(row["sizes"].as_array().unwrap().len(), 5);
}
