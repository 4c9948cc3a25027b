use regburst::error::AppResult;

fn main() -> AppResult<()> {
    regburst::entry::run()
}
