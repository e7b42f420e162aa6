use anyhow::{bail, Context, Result};
use colored::*;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<()> {
    println!("{}", "🚗 Dealership Backend Testing Tool".bright_blue().bold());
    println!("{}", "==================================".bright_blue());
    println!();

    let base_url = prompt("URL del servidor [http://localhost:8000]: ")?;
    let base_url = if base_url.is_empty() {
        "http://localhost:8000".to_string()
    } else {
        base_url.trim_end_matches('/').to_string()
    };
    let client = Client::new();

    check_health(&client, &base_url).await?;

    loop {
        println!();
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        println!("1. 🚗 Ciclo completo de vehículo (crear/listar/actualizar/borrar)");
        println!("2. 👤 Ciclo completo de personal (crear/buscar/actualizar/borrar)");
        println!("3. 🔎 Buscar personal");
        println!("4. 🚪 Salir");
        let choice = prompt("Selecciona una opción (1-4): ")?;

        let outcome = match choice.as_str() {
            "1" => smoke_cars(&client, &base_url).await,
            "2" => smoke_staff(&client, &base_url).await,
            "3" => {
                let query = prompt("Texto a buscar: ")?;
                search_staff(&client, &base_url, &query).await
            }
            "4" => {
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            _ => {
                println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red());
                continue;
            }
        };

        match outcome {
            Ok(()) => println!("{}", "✅ Prueba completada".bright_green().bold()),
            Err(e) => println!("{} {:#}", "❌ Prueba fallida:".bright_red().bold(), e),
        }
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label.bright_yellow());
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

async fn check_health(client: &Client, base_url: &str) -> Result<()> {
    let body: Value = client
        .get(format!("{}/", base_url))
        .send()
        .await
        .context("el servidor no responde")?
        .json()
        .await?;

    println!("{}", "🏥 Health check:".bright_cyan());
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

/// Enviar una petición y comprobar el código esperado
async fn expect(
    request: reqwest::RequestBuilder,
    expected: StatusCode,
    step: &str,
) -> Result<Value> {
    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    if status != expected {
        bail!("{}: esperado {}, recibido {} ({})", step, expected, status, text);
    }
    println!("  {} {} → {}", "✔".bright_green(), step, status);

    if text.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(serde_json::from_str(&text)?)
    }
}

async fn smoke_cars(client: &Client, base_url: &str) -> Result<()> {
    let cars = format!("{}/api/cars", base_url);
    println!("{}", "🚗 VEHÍCULOS".bright_cyan().bold());

    let created = expect(
        client.post(&cars).json(&json!({
            "brand": "Toyota",
            "model": "Camry",
            "year": 2022,
            "vin": "4T1BF1FK5CU123456",
            "color": "White",
            "mileage": 12000,
            "purchase_price": 23000.0,
            "selling_price": 26500.0,
            "manager": "Smoke Test"
        })),
        StatusCode::CREATED,
        "POST /api/cars",
    )
    .await?;
    let id = created["id"].as_str().context("respuesta sin id")?.to_string();
    let item = format!("{}/{}", cars, id);

    expect(client.get(&item), StatusCode::OK, "GET /api/cars/:id").await?;
    let listed = expect(
        client.get(&cars).query(&[("status", "available")]),
        StatusCode::OK,
        "GET /api/cars?status=available",
    )
    .await?;
    println!("    {} vehículos disponibles", listed.as_array().map_or(0, Vec::len));

    expect(
        client.get(format!("{}/manager/Smoke Test", cars)),
        StatusCode::OK,
        "GET /api/cars/manager/:name",
    )
    .await?;

    let updated = expect(
        client.put(&item).json(&json!({ "status": "sold" })),
        StatusCode::OK,
        "PUT /api/cars/:id",
    )
    .await?;
    if updated["status"] != "sold" {
        bail!("el estado no cambió: {}", updated["status"]);
    }

    expect(client.delete(&item), StatusCode::NO_CONTENT, "DELETE /api/cars/:id").await?;
    expect(client.delete(&item), StatusCode::NOT_FOUND, "DELETE /api/cars/:id (repetido)").await?;
    Ok(())
}

async fn smoke_staff(client: &Client, base_url: &str) -> Result<()> {
    let staff = format!("{}/api/staff", base_url);
    println!("{}", "👤 PERSONAL".bright_cyan().bold());

    let created = expect(
        client.post(&staff).json(&json!({
            "name": "Smoke Tester",
            "inn": "7701234567",
            "phone": "+7 (495) 000-00-00",
            "email": "smoke@example.com",
            "city": "Moscow"
        })),
        StatusCode::CREATED,
        "POST /api/staff",
    )
    .await?;
    let id = created["id"].as_str().context("respuesta sin id")?.to_string();
    let item = format!("{}/{}", staff, id);

    search_staff(client, base_url, "SMOKE").await?;

    expect(
        client.put(&item).json(&json!({ "total_orders": 1, "total_spent": 100.5 })),
        StatusCode::OK,
        "PUT /api/staff/:id",
    )
    .await?;
    expect(client.delete(&item), StatusCode::NO_CONTENT, "DELETE /api/staff/:id").await?;
    expect(client.get(&item), StatusCode::NOT_FOUND, "GET /api/staff/:id (borrado)").await?;
    Ok(())
}

async fn search_staff(client: &Client, base_url: &str, query: &str) -> Result<()> {
    let found = expect(
        client.get(format!("{}/api/staff/search", base_url)).query(&[("q", query)]),
        StatusCode::OK,
        "GET /api/staff/search",
    )
    .await?;

    for member in found.as_array().into_iter().flatten() {
        println!(
            "    • {} <{}> {}",
            member["name"].as_str().unwrap_or_default(),
            member["email"].as_str().unwrap_or_default(),
            member["city"].as_str().unwrap_or_default()
        );
    }
    Ok(())
}
