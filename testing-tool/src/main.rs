use anyhow::{bail, Context, Result};
use colored::*;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<()> {
    println!("{}", "🚕 Ride Dispatch Testing Tool".bright_blue().bold());
    println!("{}", "=====================================".bright_blue());
    println!();

    let base_url = get_base_url()?;
    let client = Client::new();

    check_health(&client, &base_url).await?;

    loop {
        println!();
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        println!("1. 🔁 Ejecutar ciclo de vida completo de un viaje");
        println!("2. 📄 Listar viajes");
        println!("3. 🚪 Salir");
        print!("{}", "Selecciona una opción (1-3): ".bright_yellow());
        io::stdout().flush()?;

        let mut choice = String::new();
        io::stdin().read_line(&mut choice)?;

        match choice.trim() {
            "1" => {
                if let Err(e) = run_lifecycle(&client, &base_url).await {
                    println!("{} {:#}", "❌ Escenario fallido:".bright_red().bold(), e);
                }
            }
            "2" => list_rides(&client, &base_url).await?,
            "3" => {
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            _ => {
                println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red());
            }
        }
    }

    Ok(())
}

fn get_base_url() -> Result<String> {
    print!("{}", "URL del servidor [http://localhost:8080]: ".bright_yellow());
    io::stdout().flush()?;

    let mut url = String::new();
    io::stdin().read_line(&mut url)?;
    let url = url.trim().trim_end_matches('/');

    Ok(if url.is_empty() {
        "http://localhost:8080".to_string()
    } else {
        url.to_string()
    })
}

async fn check_health(client: &Client, base_url: &str) -> Result<()> {
    let response = client
        .get(format!("{}/health", base_url))
        .send()
        .await
        .context("El servidor no responde")?;
    let body: Value = response.json().await?;

    println!(
        "{} backend={} ({})",
        "✅ Servidor disponible".bright_green(),
        body["backend"].as_str().unwrap_or("?"),
        body["timestamp"].as_str().unwrap_or("")
    );
    Ok(())
}

// Teléfonos distintos en cada ejecución para no chocar con datos previos
fn unique_phone(offset: i64) -> i64 {
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0);
    600_000_000 + (millis % 10_000_000) * 10 + offset
}

async fn call(
    client: &Client,
    method: reqwest::Method,
    url: String,
    body: Option<Value>,
    expected: StatusCode,
) -> Result<Value> {
    println!("{} {} {}", "📤".bright_blue(), method, url);

    let mut request = client.request(method, &url);
    if let Some(body) = body {
        request = request.json(&body);
    }

    let response = request.send().await?;
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status != expected {
        bail!("esperado {}, recibido {}: {}", expected, status, body);
    }

    println!("   {} {}", format!("{}", status).bright_green(), body);
    Ok(body)
}

async fn run_lifecycle(client: &Client, base_url: &str) -> Result<()> {
    println!();
    println!("{}", "🔁 CICLO DE VIDA DE UN VIAJE".bright_cyan().bold());
    println!("{}", "============================".bright_cyan());

    let passenger = call(
        client,
        reqwest::Method::POST,
        format!("{}/passengers", base_url),
        Some(json!({"first_name": "Ana", "last_name": "Gil", "phone_number": unique_phone(1)})),
        StatusCode::CREATED,
    )
    .await?;
    let passenger_id = passenger["id"].as_i64().context("respuesta sin id de pasajero")?;

    let ride = call(
        client,
        reqwest::Method::POST,
        format!("{}/rides", base_url),
        Some(json!({"passenger_id": passenger_id, "origin": "A", "destination": "B"})),
        StatusCode::CREATED,
    )
    .await?;
    let ride_id = ride["ride_id"].as_i64().context("respuesta sin ride_id")?;

    let driver = call(
        client,
        reqwest::Method::POST,
        format!("{}/drivers", base_url),
        Some(json!({
            "first_name": "Luis",
            "last_name": "Mora",
            "phone_number": unique_phone(2),
            "car_type": "sedan",
            "license_plate": 4821
        })),
        StatusCode::CREATED,
    )
    .await?;
    let driver_id = driver["id"].as_i64().context("respuesta sin id de conductor")?;

    let assign_url = format!("{}/rides/{}/driver", base_url, ride_id);
    call(
        client,
        reqwest::Method::PUT,
        assign_url.clone(),
        Some(json!({"driver_id": driver_id})),
        StatusCode::OK,
    )
    .await?;

    // Repetir la asignación debe dar conflicto
    call(
        client,
        reqwest::Method::PUT,
        assign_url,
        Some(json!({"driver_id": driver_id})),
        StatusCode::CONFLICT,
    )
    .await?;

    let status_url = format!("{}/rides/{}/status", base_url, ride_id);
    call(
        client,
        reqwest::Method::PUT,
        status_url.clone(),
        Some(json!({"status": "completed"})),
        StatusCode::OK,
    )
    .await?;

    call(
        client,
        reqwest::Method::PUT,
        status_url,
        Some(json!({"status": "cancelled"})),
        StatusCode::UNPROCESSABLE_ENTITY,
    )
    .await?;

    let ride = call(
        client,
        reqwest::Method::GET,
        format!("{}/rides/{}", base_url, ride_id),
        None,
        StatusCode::OK,
    )
    .await?;

    if ride["status"] != "completed" {
        bail!("el viaje {} terminó en estado {}", ride_id, ride["status"]);
    }

    println!();
    println!("{}", "🎉 Escenario completado sin errores".bright_green().bold());
    Ok(())
}

async fn list_rides(client: &Client, base_url: &str) -> Result<()> {
    let rides: Value = client
        .get(format!("{}/rides", base_url))
        .send()
        .await?
        .json()
        .await?;

    let rides = rides.as_array().cloned().unwrap_or_default();
    println!("{} {}", "📄 Viajes registrados:".bright_cyan().bold(), rides.len());
    for ride in rides {
        println!(
            "   #{} {} → {} [{}] conductor: {}",
            ride["ride_id"],
            ride["origin"].as_str().unwrap_or(""),
            ride["destination"].as_str().unwrap_or(""),
            ride["status"].as_str().unwrap_or("?"),
            ride["driver"]["id"]
        );
    }
    Ok(())
}
