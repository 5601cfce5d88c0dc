// demos/drakefile.rs
//
// A small Drakefile. Try:
//   cargo run --example drakefile -- -l
//   cargo run --example drakefile -- -L
//   cargo run --example drakefile -- -d /tmp/drake-demo hello who=you
//   cargo run --example drakefile -- -d /tmp/drake-demo -n build/greeting.txt

use std::time::Duration;

use drake::{
    abort, action, quote, sh, sh_capture, sleep, touch, write_file, Drake, ShOptions,
    TaskDescriptor,
};

fn task(name: &str, prerequisites: &[&str]) -> TaskDescriptor {
    match TaskDescriptor::new(name, prerequisites.iter().copied()) {
        Ok(task) => task,
        Err(err) => {
            eprintln!("drake error: {err}");
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let mut drake = Drake::new();

    drake.register(
        task("hello", &[])
            .with_description("Greet someone (who=NAME)")
            .with_action(action(|ctx| async move {
                let who = ctx.var("who").unwrap_or("world").to_string();
                sh(format!("echo Hello, {}", quote([who])), &ShOptions::new()).await
            })),
    );

    drake.register(
        task("input.txt", &[])
            .with_action(action(|ctx| async move { touch([ctx.name]) })),
    );

    drake.register(
        task("build/greeting.txt", &["input.txt"])
            .with_description("Build the greeting file")
            .with_action(action(|ctx| async move {
                let out = sh_capture("date", &ShOptions::new()).await?;
                if !out.success() {
                    return Err(abort(format!("date failed: {}", out.error)));
                }
                write_file(&ctx.name, &format!("built at {}", out.output))
            })),
    );

    drake.register(
        task("pause", &[])
            .with_description("Sleep for a second")
            .with_action(action(|_| async {
                sleep(Duration::from_secs(1)).await;
                Ok(())
            })),
    );

    drake.register(task("all", &["hello", "build/greeting.txt"]).with_description("Everything"));

    drake.set_default_task("all");
    drake.main().await;
}
