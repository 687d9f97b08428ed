//! Reconciling an invocation's arguments with a candidate declaration's parameters.

use mend_types::{is_assignable, Type, TypeEnv};

/// How a call differs from one candidate declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureDiff {
    /// Every argument is assignable to its parameter.
    Match,
    /// The candidate has parameters the call supplies no argument for: `(parameter
    /// index, parameter type)`. Fixed by adding arguments, or by removing the parameters.
    AddParameters(Vec<(usize, Type)>),
    /// The call passes arguments the candidate has no parameter for (argument indices).
    /// Fixed by removing the arguments, or by adding parameters.
    RemoveParameters(Vec<usize>),
    /// Exchanging the arguments at the two positions makes the call applicable.
    SwapParameters(usize, usize),
    /// Exactly one argument is not assignable: its index and the argument's type.
    ChangeParameterType(usize, Type),
    /// The call is applicable but its result does not fit the expected type.
    ChangeReturnType(Type),
}

/// Compare `args` against `params`. Returns `None` when none of the reconciliations
/// applies. Precedence: subsequence (add/remove), then a single swap, then a single
/// type change.
pub fn diff(env: &dyn TypeEnv, args: &[Type], params: &[Type]) -> Option<SignatureDiff> {
    if args.len() < params.len() {
        return missing_positions(env, args, params).map(|missing| {
            SignatureDiff::AddParameters(
                missing.into_iter().map(|idx| (idx, params[idx].clone())).collect(),
            )
        });
    }
    if args.len() > params.len() {
        return extra_positions(env, args, params).map(SignatureDiff::RemoveParameters);
    }

    let mismatched: Vec<usize> = (0..args.len())
        .filter(|&idx| !is_assignable(env, &args[idx], &params[idx]))
        .collect();
    match mismatched.as_slice() {
        [] => Some(SignatureDiff::Match),
        [single] => swap_for(env, args, params, &mismatched)
            .or_else(|| Some(SignatureDiff::ChangeParameterType(*single, args[*single].clone()))),
        [_, _] => swap_for(env, args, params, &mismatched),
        _ => None,
    }
}

/// Like [`diff`], then checks the result type of a matching call against `expected`.
pub fn diff_with_return(
    env: &dyn TypeEnv,
    args: &[Type],
    params: &[Type],
    return_type: &Type,
    expected: Option<&Type>,
) -> Option<SignatureDiff> {
    match diff(env, args, params)? {
        SignatureDiff::Match => match expected {
            Some(expected)
                if !expected.is_void()
                    && expected.is_known()
                    && !is_assignable(env, return_type, expected) =>
            {
                Some(SignatureDiff::ChangeReturnType(expected.clone()))
            }
            _ => Some(SignatureDiff::Match),
        },
        other => Some(other),
    }
}

/// Parameter indices left over when the arguments are matched in order against the
/// parameters.
fn missing_positions(env: &dyn TypeEnv, args: &[Type], params: &[Type]) -> Option<Vec<usize>> {
    let mut missing = Vec::new();
    let mut next_arg = 0;
    for (idx, param) in params.iter().enumerate() {
        let remaining_params = params.len() - idx;
        let remaining_args = args.len() - next_arg;
        if remaining_args > 0 && is_assignable(env, &args[next_arg], param) {
            next_arg += 1;
        } else if remaining_params == remaining_args {
            return None;
        } else {
            missing.push(idx);
        }
    }
    (next_arg == args.len()).then_some(missing)
}

/// Argument indices left over when the parameters are matched in order against the
/// arguments.
fn extra_positions(env: &dyn TypeEnv, args: &[Type], params: &[Type]) -> Option<Vec<usize>> {
    let mut extra = Vec::new();
    let mut next_param = 0;
    for (idx, arg) in args.iter().enumerate() {
        let remaining_args = args.len() - idx;
        let remaining_params = params.len() - next_param;
        if remaining_params > 0 && is_assignable(env, arg, &params[next_param]) {
            next_param += 1;
        } else if remaining_args == remaining_params {
            return None;
        } else {
            extra.push(idx);
        }
    }
    (next_param == params.len()).then_some(extra)
}

/// A transposition of two arguments, one of which is mismatched, that makes every
/// argument assignable.
fn swap_for(
    env: &dyn TypeEnv,
    args: &[Type],
    params: &[Type],
    mismatched: &[usize],
) -> Option<SignatureDiff> {
    let fits = |i: usize, j: usize| {
        is_assignable(env, &args[i], &params[j]) && is_assignable(env, &args[j], &params[i])
    };
    match mismatched {
        [i, j] => fits(*i, *j).then_some(SignatureDiff::SwapParameters(*i, *j)),
        [i] => (0..args.len())
            .filter(|j| j != i)
            .find(|&j| fits(*i, j))
            .map(|j| SignatureDiff::SwapParameters((*i).min(j), (*i).max(j))),
        _ => None,
    }
}
