use crate::{
    argument::Argument,
    context::ExecContext,
    error::FunctionResult,
    functions::{expect_args, text_arg},
};

/// Convert text to lowercase
pub fn eval_lower(out: &mut Vec<u8>, _ctx: &ExecContext<'_>, args: &[Argument<'_>]) -> FunctionResult {
    let args = expect_args("lower", args, 1)?;
    out.extend_from_slice(text_arg("lower", &args[0])?.to_lowercase().as_bytes());
    Ok(())
}

/// Convert text to uppercase
pub fn eval_upper(out: &mut Vec<u8>, _ctx: &ExecContext<'_>, args: &[Argument<'_>]) -> FunctionResult {
    let args = expect_args("upper", args, 1)?;
    out.extend_from_slice(text_arg("upper", &args[0])?.to_uppercase().as_bytes());
    Ok(())
}

/// Concatenate the values of all arguments
pub fn eval_concat(out: &mut Vec<u8>, _ctx: &ExecContext<'_>, args: &[Argument<'_>]) -> FunctionResult {
    for arg in args {
        arg.value(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CompileFailure, FunctionError};
    use query_ast::NodeId;

    fn eval(
        func: fn(&mut Vec<u8>, &ExecContext<'_>, &[Argument<'_>]) -> FunctionResult,
        args: &[Argument<'_>],
    ) -> Result<Vec<u8>, FunctionError> {
        let mut out = Vec::new();
        func(&mut out, &ExecContext::default(), args)?;
        Ok(out)
    }

    #[test]
    fn test_lower_upper() {
        let args = [Argument::literal(NodeId(0), "Hello World")];
        assert_eq!(eval(eval_lower, &args).unwrap(), b"hello world");
        assert_eq!(eval(eval_upper, &args).unwrap(), b"HELLO WORLD");
    }

    #[test]
    fn test_lower_without_args() {
        let err = eval(eval_lower, &[]).unwrap_err();
        assert!(matches!(
            err,
            FunctionError::InvalidFunctionArgs { ref function, .. } if function == "lower"
        ));
        assert_eq!(err.into_failure(), CompileFailure::Unlocated);
    }

    #[test]
    fn test_upper_rejects_binary() {
        let args = [Argument::literal(NodeId(0), vec![0xff, 0xfe])];
        let err = eval(eval_upper, &args).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid function arguments for upper: Expected UTF-8 text"
        );
    }

    #[test]
    fn test_concat() {
        let args = [
            Argument::literal(NodeId(0), "price"),
            Argument::literal(NodeId(1), "_"),
            Argument::literal(NodeId(2), "eur"),
        ];
        assert_eq!(eval(eval_concat, &args).unwrap(), b"price_eur");
        assert_eq!(eval(eval_concat, &[]).unwrap(), b"");
    }

    #[test]
    fn test_concat_keeps_argument_location() {
        let args = [
            Argument::literal(NodeId(0), "a"),
            Argument::predicate(NodeId(7), Vec::new(), |_, _| Ok(())),
        ];
        let err = eval(eval_concat, &args).unwrap_err();
        assert_eq!(err.into_failure(), CompileFailure::At(NodeId(7)));
    }
}
