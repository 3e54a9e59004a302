fn main() -> anyhow::Result<()> {
    enzovu::cli::run_cli()
}
