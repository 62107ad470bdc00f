use axum::response::Html;

pub async fn health() -> &'static str {
    "ok"
}

pub async fn index() -> Html<&'static str> {
    Html("<h1>Library Hall</h1><p>Booking administration service.</p>")
}
