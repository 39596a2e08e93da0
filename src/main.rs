fn main() -> anyhow::Result<()> {
    termbase::cli::run()
}
