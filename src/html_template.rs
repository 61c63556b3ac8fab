use axum::response::Html;

use crate::route::render::{RouteMap, RoutePlaceholder};
use crate::route::RouteView;
use crate::theme::Theme;

const THEME_PLACEHOLDER: &str = "<!-- THEME_CLASS -->";

/// Escapes text for use in element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Stamps the server-side default theme onto the embedded index page. The
/// inline script in the page still applies a stored visitor preference
/// before first paint.
pub fn index_page(template: &str, theme: Theme) -> Html<String> {
    Html(template.replace(THEME_PLACEHOLDER, theme.as_str()))
}

fn placeholder_block(placeholder: &RoutePlaceholder) -> String {
    format!(
        r#"<div class="route-placeholder" data-code="{code}">
        <div class="route-placeholder-icon">{icon}</div>
        <div class="route-placeholder-name">{name}</div>
        <div class="route-placeholder-error">{error}</div>
    </div>"#,
        code = placeholder.code,
        icon = placeholder.icon,
        name = escape_html(&placeholder.name),
        error = escape_html(&placeholder.error),
    )
}

fn map_block(map: &RouteMap) -> String {
    // Serializing our own structs cannot fail; fall back to null just in case
    let view_json = serde_json::to_string(map).unwrap_or_else(|_| "null".to_string());
    // Keep "</script>" inside the route name from closing the tag early
    let view_json = view_json.replace("</", "<\\/");

    format!(
        r#"<div id="map" class="route-map" aria-label="{name}"></div>
    <div class="route-loading" id="route-loading">Loading {name}...</div>
    <script>
        const view = {view_json};
        const map = L.map('map', {{ attributionControl: false }});
        L.tileLayer('https://{{s}}.tile.opentopomap.org/{{z}}/{{x}}/{{y}}.png', {{
            maxZoom: 17
        }}).addTo(map);

        const line = L.geoJSON(view.line, {{
            style: {{
                color: view.line_style.color,
                weight: view.line_style.width,
                opacity: 1,
                lineJoin: 'round',
                lineCap: 'round'
            }}
        }}).addTo(map);

        const b = view.bounds;
        map.fitBounds([[b.minLat, b.minLng], [b.maxLat, b.maxLng]], {{
            padding: [view.padding, view.padding]
        }});

        for (const marker of [view.start, view.finish]) {{
            L.circleMarker([marker.position[1], marker.position[0]], {{
                radius: 8,
                color: '#ffffff',
                weight: 2,
                fillColor: marker.color,
                fillOpacity: 1
            }}).bindTooltip(marker.kind).addTo(map);
        }}

        document.getElementById('route-loading').remove();
        // Release the map surface when the page goes away
        window.addEventListener('pagehide', () => map.remove());
    </script>"#,
        name = escape_html(&map.name),
    )
}

/// Full page for one route: a Leaflet map, or the static placeholder.
pub fn route_page(view: &RouteView, theme: Theme) -> Html<String> {
    let (title, body) = match view {
        RouteView::Map(map) => (map.name.as_str(), map_block(map)),
        RouteView::Placeholder(placeholder) => {
            (placeholder.name.as_str(), placeholder_block(placeholder))
        }
    };

    let html = ROUTE_HTML
        .replace("<!-- TITLE -->", &escape_html(title))
        .replace(THEME_PLACEHOLDER, theme.as_str())
        .replace("<!-- ROUTE_BODY -->", &body);
    Html(html)
}

// HTML template for a single route page
const ROUTE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en" class="<!-- THEME_CLASS -->">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title><!-- TITLE --></title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <link rel="stylesheet" href="/style.css" />
</head>
<body class="route-page">
    <!-- ROUTE_BODY -->
</body>
</html>
"#;
