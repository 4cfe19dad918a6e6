/// Fine-grained access check beyond plain login status.
///
/// Guards only consult an authorizer once the user is known to be logged
/// in, so implementations always receive a present user.
pub trait Authorizer<U> {
    fn authorize(&self, user: &U) -> bool;
}

impl<U, F> Authorizer<U> for F
where
    F: Fn(&U) -> bool,
{
    fn authorize(&self, user: &U) -> bool {
        self(user)
    }
}
