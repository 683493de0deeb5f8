use coffee_rhythms::{config::get_config, serve, App, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // We have a different logging mechanism for production
    #[cfg(not(debug_assertions))]
    {
        coffee_rhythms::init_production_tracing()
    }
    #[cfg(debug_assertions)]
    {
        coffee_rhythms::init_dbg_tracing();
    }

    // A missing database url stops the process here, before anything binds.
    let config = get_config()?;
    let app = App::build_from_config(config).await?;

    serve(app).await?;

    Ok(())
}
