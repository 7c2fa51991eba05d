//! Terminal driver for the Arte Metamodelado companion.
//!
//! All logic lives in the library modules; this binary only routes stdin
//! lines to whichever surface the current view selects.

mod llm;
mod prompts;
mod services;
mod state;

use std::io::Write as _;

use tokio::io::{AsyncBufReadExt, BufReader};

use services::chat::ChatSession;
use services::dialogue::{Dialogue, Phase};
use services::workshop::{MutationFilter, Workshop};
use state::{AppState, View};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let app = AppState::new(llm::Llm::new());
    let chat = ChatSession::new(app.llm.clone());
    let workshop = Workshop::new(app.llm.clone());
    let dialogue = Dialogue::new(app.llm.clone());

    println!("ARTE METAMODELADO // consola de mutación");
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut round: u32 = 0;

    loop {
        print!("[{}] > ", view_tag(app.view()));
        std::io::stdout().flush().ok();

        let Ok(Some(line)) = lines.next_line().await else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line {
            ":salir" => break,
            ":inicio" => app.navigate(View::Home),
            ":aprender" => app.navigate(View::Learn),
            ":chat" => app.navigate(View::Chat),
            ":taller" => {
                app.navigate(View::Workshop);
                println!("Formato: filtro: idea  (filtros: glitch, fragment, sabotage, code)");
            }
            ":pulpo" => {
                app.navigate(View::Quiz);
                println!("{}", dialogue.state().message);
            }
            ":otra" => println!("{}", dialogue.reset().message),
            ":puntos" => println!(
                "PUNTOS DE MUTACIÓN: {} // retos completados: {}",
                app.progress.points(),
                app.progress.completed_count()
            ),
            ":ayuda" => print_help(),
            _ => dispatch(&app, &chat, &workshop, &dialogue, &mut round, line).await,
        }
    }
}

/// Route free text to the surface behind the current view.
async fn dispatch(
    app: &AppState,
    chat: &ChatSession,
    workshop: &Workshop,
    dialogue: &Dialogue,
    round: &mut u32,
    line: &str,
) {
    match app.view() {
        View::Home | View::Learn => {
            println!("Navega con :chat, :taller o :pulpo.");
        }
        View::Chat => match chat.send(line).await {
            Some(reply) if reply.is_error => println!("[ERROR] {}", reply.text),
            Some(reply) => println!("{}", reply.text),
            None => println!("(la interfaz está ocupada)"),
        },
        View::Workshop => {
            let Some((filter_raw, idea)) = line.split_once(':') else {
                println!("Formato: filtro: idea");
                return;
            };
            let Some(filter) = MutationFilter::parse(filter_raw) else {
                println!("Filtros: glitch, fragment, sabotage, code");
                return;
            };
            match workshop.mutate(idea, filter).await {
                Some(output) => println!("RESULTADO:\n{output}"),
                None => println!("(la idea está vacía o hay una mutación en curso)"),
            }
        }
        View::Quiz => {
            if dialogue.state().phase == Phase::Feedback {
                println!("Usa :otra para otra mutación.");
                return;
            }
            let state = dialogue.submit(line, &app.progress).await;
            println!("{}", state.message);
            if state.phase == Phase::Feedback {
                *round += 1;
                app.progress.mark_complete(*round);
                println!(
                    "+{} PTS // total: {} (usa :otra para otra mutación)",
                    state.points_earned,
                    app.progress.points()
                );
            }
        }
    }
}

fn view_tag(view: View) -> &'static str {
    match view {
        View::Home => "INICIO",
        View::Learn => "APRENDER",
        View::Chat => "CHAT",
        View::Workshop => "TALLER",
        View::Quiz => "PULPO",
    }
}

fn print_help() {
    println!("Comandos: :inicio :aprender :chat :taller :pulpo :otra :puntos :ayuda :salir");
    println!("Todo lo demás se envía a la superficie activa.");
}
