use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        HalftoneError::context("x")
            .to_string()
            .starts_with("context error:")
    );
    assert!(
        HalftoneError::shader("x")
            .to_string()
            .starts_with("shader error:")
    );
    assert!(
        HalftoneError::validation("x")
            .to_string()
            .starts_with("validation error:")
    );
    assert!(
        HalftoneError::render("x")
            .to_string()
            .starts_with("render error:")
    );
    assert!(
        HalftoneError::asset("x")
            .to_string()
            .starts_with("asset error:")
    );
}

#[test]
fn anyhow_context_converts_through_question_mark() {
    fn read_missing() -> HalftoneResult<Vec<u8>> {
        use anyhow::Context as _;
        let bytes = std::fs::read("/definitely/not/here.png").context("read source image")?;
        Ok(bytes)
    }

    let err = read_missing().unwrap_err();
    assert!(matches!(err, HalftoneError::Other(_)));
    assert!(err.to_string().contains("read source image"));
}
